//! Backend de hojas en memoria.
//!
//! Tablas protegidas por `Mutex`: los appends quedan serializados por el
//! lock, que es exactamente la garantía de linealización que se asume del
//! backend real. Incluye una perilla de inyección de fallos para probar el
//! camino "registro posterior fallido".

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use informe_domain::Registro;

use crate::error::RegistryError;
use crate::sheet::SheetClient;

#[derive(Default)]
pub struct InMemorySheetClient {
    tables: Mutex<HashMap<String, Vec<Vec<String>>>>,
    fail_appends: Mutex<HashSet<String>>,
}

impl InMemorySheetClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Siembra una hoja completa (cabecera + filas) para tests.
    pub fn with_table(self, tab: &str, rows: Vec<Vec<&str>>) -> Self {
        {
            let mut tables = self.tables.lock().expect("tablas envenenadas");
            tables.insert(tab.to_string(),
                          rows.into_iter()
                              .map(|r| r.into_iter().map(|c| c.to_string()).collect())
                              .collect());
        }
        self
    }

    /// A partir de ahora, todo `append_row` sobre `tab` falla. Simula la
    /// ventana de inconsistencia aceptada: documento generado sin rastro en
    /// la bitácora.
    pub fn fail_appends_on(&self, tab: &str) {
        self.fail_appends
            .lock()
            .expect("fallos envenenados")
            .insert(tab.to_string());
    }

    /// Copia de las filas crudas de una hoja (para asserts).
    pub fn raw_rows(&self, tab: &str) -> Vec<Vec<String>> {
        self.tables
            .lock()
            .expect("tablas envenenadas")
            .get(tab)
            .cloned()
            .unwrap_or_default()
    }
}

impl SheetClient for InMemorySheetClient {
    fn ensure_worksheet(&self, tab: &str) -> Result<(), RegistryError> {
        let mut tables = self.tables
                             .lock()
                             .map_err(|_| RegistryError::Transport("lock envenenado".into()))?;
        tables.entry(tab.to_string()).or_default();
        Ok(())
    }

    fn first_row(&self, tab: &str) -> Result<Vec<String>, RegistryError> {
        let tables = self.tables
                         .lock()
                         .map_err(|_| RegistryError::Transport("lock envenenado".into()))?;
        Ok(tables.get(tab).and_then(|rows| rows.first()).cloned().unwrap_or_default())
    }

    fn update_range(&self,
                    tab: &str,
                    start_row: usize,
                    start_col: usize,
                    values: Vec<Vec<String>>)
                    -> Result<(), RegistryError> {
        let mut tables = self.tables
                             .lock()
                             .map_err(|_| RegistryError::Transport("lock envenenado".into()))?;
        let rows = tables.entry(tab.to_string()).or_default();
        for (i, fila) in values.into_iter().enumerate() {
            let r = start_row - 1 + i;
            while rows.len() <= r {
                rows.push(Vec::new());
            }
            let destino = &mut rows[r];
            for (j, celda) in fila.into_iter().enumerate() {
                let c = start_col - 1 + j;
                while destino.len() <= c {
                    destino.push(String::new());
                }
                destino[c] = celda;
            }
        }
        Ok(())
    }

    fn append_row(&self, tab: &str, row: Vec<String>) -> Result<(), RegistryError> {
        if self.fail_appends
               .lock()
               .map_err(|_| RegistryError::Transport("lock envenenado".into()))?
               .contains(tab)
        {
            return Err(RegistryError::Transport(format!("append rechazado sobre '{}'", tab)));
        }
        let mut tables = self.tables
                             .lock()
                             .map_err(|_| RegistryError::Transport("lock envenenado".into()))?;
        tables.entry(tab.to_string()).or_default().push(row);
        Ok(())
    }

    fn row_count(&self, tab: &str) -> Result<usize, RegistryError> {
        let tables = self.tables
                         .lock()
                         .map_err(|_| RegistryError::Transport("lock envenenado".into()))?;
        Ok(tables.get(tab).map(|rows| rows.len()).unwrap_or(0))
    }

    fn read_records(&self, tab: &str) -> Result<Vec<Registro>, RegistryError> {
        let tables = self.tables
                         .lock()
                         .map_err(|_| RegistryError::Transport("lock envenenado".into()))?;
        let rows = match tables.get(tab) {
            Some(r) if !r.is_empty() => r,
            _ => return Ok(vec![]),
        };
        let headers = &rows[0];
        let mut out = Vec::with_capacity(rows.len().saturating_sub(1));
        for fila in rows.iter().skip(1) {
            let mut reg = Registro::new();
            for (i, h) in headers.iter().enumerate() {
                if h.is_empty() {
                    continue;
                }
                reg.insert(h.clone(), fila.get(i).cloned().unwrap_or_default());
            }
            out.push(reg);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_records_maps_headers_to_values() {
        let client = InMemorySheetClient::new().with_table("Hoja",
                                                           vec![vec!["a", "b"], vec!["1", "2"], vec!["3", ""]]);
        let regs = client.read_records("Hoja").unwrap();
        assert_eq!(regs.len(), 2);
        assert_eq!(regs[0].get("a").unwrap(), "1");
        assert_eq!(regs[1].get("b").unwrap(), "");
    }

    #[test]
    fn update_range_grows_table_as_needed() {
        let client = InMemorySheetClient::new();
        client.ensure_worksheet("Hoja").unwrap();
        client.update_range("Hoja", 1, 1, vec![vec!["x".into(), "y".into()]]).unwrap();
        assert_eq!(client.first_row("Hoja").unwrap(), vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn append_failure_injection() {
        let client = InMemorySheetClient::new();
        client.ensure_worksheet("Hoja").unwrap();
        client.fail_appends_on("Hoja");
        assert!(client.append_row("Hoja", vec!["z".into()]).is_err());
    }
}
