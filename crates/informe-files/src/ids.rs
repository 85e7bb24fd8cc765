//! Extracción de identificadores de archivo.
//!
//! Formatos aceptados, probados en este orden:
//! - el ID puro (alfanumérico, `_` y `-`, longitud >= 20);
//! - URLs con segmento de ruta `/d/<ID>/`;
//! - URLs con parámetro `?id=<ID>` o `&id=<ID>`.
//! Lo que no calce con ninguno no produce identificador y se descarta.

use once_cell::sync::Lazy;
use regex::Regex;

static ID_RAW: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]{20,}$").expect("regex id puro"));

static ID_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    vec![Regex::new(r"/d/([a-zA-Z0-9_-]{20,})/").expect("regex /d/"),
         Regex::new(r"[?&]id=([a-zA-Z0-9_-]{20,})").expect("regex ?id=")]
});

/// Devuelve el ID desde una URL o un ID directo; `None` si no hay match.
pub fn extract_file_id(url_or_id: &str) -> Option<String> {
    let s = url_or_id.trim();
    if s.is_empty() {
        return None;
    }
    if ID_RAW.is_match(s) {
        return Some(s.to_string());
    }
    for pat in ID_PATTERNS.iter() {
        if let Some(c) = pat.captures(s) {
            if let Some(m) = c.get(1) {
                return Some(m.as_str().to_string());
            }
        }
    }
    None
}

/// Extrae IDs válidos de una lista mixta, deduplicando con política
/// primera-aparición-gana y conservando el orden.
pub fn normalize_ids<I, S>(mixed: I) -> Vec<String>
    where I: IntoIterator<Item = S>,
          S: AsRef<str>
{
    let mut seen = std::collections::HashSet::new();
    let mut unique = Vec::new();
    for x in mixed {
        if let Some(fid) = extract_file_id(x.as_ref()) {
            if seen.insert(fid.clone()) {
                unique.push(fid);
            }
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "ABCDEFGHIJ0123456789";

    #[test]
    fn extracts_from_share_url() {
        let url = format!("https://drive.example.com/file/d/{}/view?usp=sharing", ID);
        assert_eq!(extract_file_id(&url).as_deref(), Some(ID));
    }

    #[test]
    fn extracts_from_query_parameter() {
        let abierto = format!("https://drive.example.com/open?id={}", ID);
        assert_eq!(extract_file_id(&abierto).as_deref(), Some(ID));
        let uc = format!("https://drive.example.com/uc?export=download&id={}", ID);
        assert_eq!(extract_file_id(&uc).as_deref(), Some(ID));
    }

    #[test]
    fn accepts_bare_id_as_is() {
        assert_eq!(extract_file_id(ID).as_deref(), Some(ID));
        assert_eq!(extract_file_id(&format!("  {}  ", ID)).as_deref(), Some(ID));
        // los guiones son parte del alfabeto válido
        let con_guiones = "plain-id-ABCDEFGHIJ0123456789";
        assert_eq!(extract_file_id(con_guiones).as_deref(), Some(con_guiones));
    }

    #[test]
    fn rejects_short_or_invalid() {
        assert_eq!(extract_file_id("short"), None);
        assert_eq!(extract_file_id(""), None);
        assert_eq!(extract_file_id("tiene espacios y ya"), None);
    }

    #[test]
    fn normalize_dedups_preserving_first_seen_order() {
        let a = "AAAAAAAAAAAAAAAAAAAA";
        let b = "BBBBBBBBBBBBBBBBBBBB";
        let c = "CCCCCCCCCCCCCCCCCCCC";
        let ids = normalize_ids([a, b, a, c]);
        assert_eq!(ids, vec![a.to_string(), b.to_string(), c.to_string()]);
    }

    #[test]
    fn normalize_drops_unparseable_entries() {
        let a = "AAAAAAAAAAAAAAAAAAAA";
        let ids = normalize_ids(["nada", a, "x"]);
        assert_eq!(ids, vec![a.to_string()]);
    }
}
