//! Nombres de archivo de los documentos generados.

/// Reemplaza secuencias de caracteres inválidos en sistemas de archivos
/// (`\ / : " * ? < > |`) por un único `_`, recortando espacios extremos.
pub fn safe_filename(text: &str) -> String {
    const INVALID: &[char] = &['\\', '/', ':', '"', '*', '?', '<', '>', '|'];
    let mut out = String::with_capacity(text.len());
    let mut in_run = false;
    for c in text.trim().chars() {
        if INVALID.contains(&c) {
            if !in_run {
                out.push('_');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }
    out.trim().to_string()
}

/// Nombre del documento: `{numero}_{proyecto}_{cliente}_{fecha}.docx`, con
/// espacios→`_` en proyecto/cliente y separadores de fecha normalizados a
/// `-`. Si todas las partes variables quedan vacías, cae a `{numero}.docx`.
pub fn document_file_name(numero_informe: &str, nombre_proyecto: &str, cliente: &str, fecha: &str) -> String {
    let proyecto_safe = safe_filename(nombre_proyecto).replace(' ', "_");
    let cliente_safe = safe_filename(cliente).replace(' ', "_");
    let fecha_safe = safe_filename(&fecha.replace(['/', '\\'], "-"));
    if proyecto_safe.is_empty() && cliente_safe.is_empty() && fecha_safe.is_empty() {
        format!("{}.docx", numero_informe)
    } else {
        format!("{}_{}_{}_{}.docx", numero_informe, proyecto_safe, cliente_safe, fecha_safe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_invalid_runs_to_single_underscore() {
        assert_eq!(safe_filename("a//b::c"), "a_b_c");
        assert_eq!(safe_filename("plan?<>ta"), "plan_ta");
    }

    #[test]
    fn keeps_ordinary_text() {
        assert_eq!(safe_filename("Planta Norte 2024"), "Planta Norte 2024");
    }

    #[test]
    fn file_name_assembles_all_parts() {
        let n = document_file_name("INF-2024-00007", "Planta Norte", "ACME S.A.", "12/03/2024");
        assert_eq!(n, "INF-2024-00007_Planta_Norte_ACME_S.A._12-03-2024.docx");
    }

    #[test]
    fn file_name_falls_back_to_number_alone() {
        assert_eq!(document_file_name("INF-2024-00001", "", "", ""), "INF-2024-00001.docx");
    }
}
