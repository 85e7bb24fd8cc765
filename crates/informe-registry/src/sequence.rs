//! Reserva de secuencia ("tomar turno").
//!
//! El consecutivo se deriva de la posición de fila en un log append-only:
//! se anexa una fila con timestamp y el número es `total_filas - 1` (la
//! fila 1 es cabecera). Ninguna fila del contador se actualiza ni se borra
//! jamás; no hay valor de contador almacenado. La unicidad bajo
//! concurrencia descansa en que el backend serialice appends y ofrezca
//! lectura tras escritura: si dos llamadores concurrentes observaran el
//! mismo conteo, colisionarían — limitación heredada y documentada, no se
//! mitiga aquí.

use chrono::{FixedOffset, Utc};

use crate::error::RegistryError;
use crate::registry::{Registry, SEQUENCE_HEADERS};

impl Registry {
    /// Anexa una fila `(timestamp, responsable, proyecto_id)` al contador y
    /// devuelve el consecutivo resultante (fila 2 => secuencia 1).
    pub fn reserve_sequence(&self, responsable: &str, proyecto_id: &str) -> Result<u64, RegistryError> {
        let tab = self.config().tab_secuencia.clone();
        self.ensure_headers(&tab, &SEQUENCE_HEADERS)?;

        let ts = timestamp_now(self.config().utc_offset_hours);
        self.client()
            .append_row(&tab, vec![ts, responsable.to_string(), proyecto_id.to_string()])?;

        let total_rows = self.client().row_count(&tab)?;
        if total_rows < 2 {
            return Err(RegistryError::Sequence(format!("la hoja '{}' reporta {} filas tras el append",
                                                       tab, total_rows)));
        }
        Ok((total_rows - 1) as u64)
    }
}

/// Timestamp `YYYY-MM-DD HH:MM:SS` en el desfase horario configurado; un
/// desfase fuera de rango cae a UTC. También lo usa la bitácora de
/// informes para fechar sus entradas.
pub fn local_timestamp(utc_offset_hours: i32) -> String {
    timestamp_now(utc_offset_hours)
}

fn timestamp_now(utc_offset_hours: i32) -> String {
    match FixedOffset::east_opt(utc_offset_hours * 3600) {
        Some(offset) => Utc::now().with_timezone(&offset).format("%Y-%m-%d %H:%M:%S").to_string(),
        None => Utc::now().format("%Y-%m-%d %H:%M:%S").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_has_expected_shape() {
        let ts = timestamp_now(-5);
        // YYYY-MM-DD HH:MM:SS
        assert_eq!(ts.len(), 19);
        assert_eq!(ts.as_bytes()[4], b'-');
        assert_eq!(ts.as_bytes()[10], b' ');
    }
}
