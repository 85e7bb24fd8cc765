//! Formato del número de informe.
//!
//! El consecutivo es global y nunca se reinicia; el segmento de año refleja
//! el momento de generación, no el de reserva. Dos informes con secuencias
//! adyacentes generados en años distintos muestran números "no contiguos":
//! comportamiento esperado, no un defecto.

use chrono::{Datelike, Utc};

/// `"{prefix}-{year}-{seq}"` con `seq` rellenado a `pad` dígitos.
/// `seq` se asume positiva (contrato del llamador).
pub fn format_report_number_for_year(seq: u64, prefix: &str, pad: usize, year: i32) -> String {
    format!("{}-{}-{:0width$}", prefix, year, seq, width = pad)
}

/// Variante con el año calendario actual.
pub fn format_report_number(seq: u64, prefix: &str, pad: usize) -> String {
    format_report_number_for_year(seq, prefix, pad, current_year())
}

pub fn current_year() -> i32 {
    Utc::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_with_zero_padding() {
        assert_eq!(format_report_number_for_year(7, "INF", 5, 2024), "INF-2024-00007");
    }

    #[test]
    fn pad_shorter_than_sequence_keeps_digits() {
        assert_eq!(format_report_number_for_year(123456, "INF", 5, 2024), "INF-2024-123456");
    }

    #[test]
    fn current_year_variant_embeds_this_year() {
        let n = format_report_number(1, "INF", 5);
        assert!(n.contains(&current_year().to_string()));
    }
}
