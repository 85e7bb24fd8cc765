//! Adaptador HTTP delgado sobre la API de valores del backend de hojas.
//!
//! Cubre sólo las operaciones del contrato `SheetClient`: metadatos (para
//! crear hojas ausentes), lectura de valores, append y escritura de rangos.
//! La autenticación es un bearer token estático tomado de la configuración;
//! la obtención/renovación de credenciales es responsabilidad externa.

use reqwest::blocking::Client;
use serde_json::{json, Value};
use std::time::Duration;

use informe_domain::Registro;

use crate::error::RegistryError;
use crate::sheet::SheetClient;

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

pub struct RestSheetClient {
    http: Client,
    base_url: String,
    spreadsheet_id: String,
    token: String,
}

impl RestSheetClient {
    pub fn new(spreadsheet_id: &str, token: &str) -> Result<Self, RegistryError> {
        Self::with_base_url(spreadsheet_id, token, DEFAULT_BASE_URL)
    }

    /// `base_url` sobreescribible para apuntar a un backend alterno.
    pub fn with_base_url(spreadsheet_id: &str, token: &str, base_url: &str) -> Result<Self, RegistryError> {
        let http = Client::builder().timeout(Duration::from_secs(30))
                                    .build()
                                    .map_err(|e| RegistryError::Transport(e.to_string()))?;
        Ok(Self { http,
                  base_url: base_url.trim_end_matches('/').to_string(),
                  spreadsheet_id: spreadsheet_id.to_string(),
                  token: token.to_string() })
    }

    fn values_url(&self, suffix: &str) -> String {
        format!("{}/v4/spreadsheets/{}/values/{}", self.base_url, self.spreadsheet_id, suffix)
    }

    fn get_json(&self, url: &str) -> Result<Value, RegistryError> {
        let resp = self.http.get(url).bearer_auth(&self.token).send()?;
        if !resp.status().is_success() {
            return Err(RegistryError::Transport(format!("GET {} -> {}", url, resp.status())));
        }
        resp.json::<Value>().map_err(|e| RegistryError::BadResponse(e.to_string()))
    }

    fn post_json(&self, url: &str, body: Value) -> Result<Value, RegistryError> {
        let resp = self.http.post(url).bearer_auth(&self.token).json(&body).send()?;
        if !resp.status().is_success() {
            return Err(RegistryError::Transport(format!("POST {} -> {}", url, resp.status())));
        }
        resp.json::<Value>().map_err(|e| RegistryError::BadResponse(e.to_string()))
    }

    /// Valores crudos de la hoja completa (vacía → sin filas). Una hoja
    /// inexistente se reporta como `Worksheet`, no como fallo de transporte.
    fn all_values(&self, tab: &str) -> Result<Vec<Vec<String>>, RegistryError> {
        let url = self.values_url(tab);
        let resp = self.http.get(&url).bearer_auth(&self.token).send()?;
        let status = resp.status();
        if status.as_u16() == 400 || status.as_u16() == 404 {
            return Err(RegistryError::Worksheet(tab.to_string(), status.to_string()));
        }
        if !status.is_success() {
            return Err(RegistryError::Transport(format!("GET {} -> {}", url, status)));
        }
        let body: Value = resp.json().map_err(|e| RegistryError::BadResponse(e.to_string()))?;
        let values = match body.get("values") {
            Some(Value::Array(rows)) => rows.iter()
                                            .map(|row| match row {
                                                Value::Array(cells) => cells.iter()
                                                                            .map(|c| match c {
                                                                                Value::String(s) => s.clone(),
                                                                                other => other.to_string(),
                                                                            })
                                                                            .collect(),
                                                _ => Vec::new(),
                                            })
                                            .collect(),
            _ => Vec::new(),
        };
        Ok(values)
    }

    fn sheet_titles(&self) -> Result<Vec<String>, RegistryError> {
        let url = format!("{}/v4/spreadsheets/{}?fields=sheets.properties.title",
                          self.base_url, self.spreadsheet_id);
        let body = self.get_json(&url)?;
        let titles = body.get("sheets")
                         .and_then(Value::as_array)
                         .map(|sheets| {
                             sheets.iter()
                                   .filter_map(|s| {
                                       s.pointer("/properties/title").and_then(Value::as_str).map(str::to_string)
                                   })
                                   .collect()
                         })
                         .unwrap_or_default();
        Ok(titles)
    }
}

/// Convierte un índice de columna (base 1) a letra A1 (`1 -> A`, `27 -> AA`).
fn column_letter(mut col: usize) -> String {
    let mut out = String::new();
    while col > 0 {
        let rem = (col - 1) % 26;
        out.insert(0, (b'A' + rem as u8) as char);
        col = (col - 1) / 26;
    }
    out
}

impl SheetClient for RestSheetClient {
    fn ensure_worksheet(&self, tab: &str) -> Result<(), RegistryError> {
        let titles = self.sheet_titles()?;
        if titles.iter().any(|t| t == tab) {
            return Ok(());
        }
        let url = format!("{}/v4/spreadsheets/{}:batchUpdate", self.base_url, self.spreadsheet_id);
        let body = json!({
            "requests": [{ "addSheet": { "properties": { "title": tab, "gridProperties": { "rowCount": 1, "columnCount": 8 } } } }]
        });
        self.post_json(&url, body)
            .map_err(|e| RegistryError::Worksheet(tab.to_string(), e.to_string()))?;
        Ok(())
    }

    fn first_row(&self, tab: &str) -> Result<Vec<String>, RegistryError> {
        let body = self.get_json(&self.values_url(&format!("{}!1:1", tab)))?;
        let row = body.get("values")
                      .and_then(Value::as_array)
                      .and_then(|rows| rows.first())
                      .and_then(Value::as_array)
                      .map(|cells| {
                          cells.iter()
                               .map(|c| c.as_str().map(str::to_string).unwrap_or_else(|| c.to_string()))
                               .collect()
                      })
                      .unwrap_or_default();
        Ok(row)
    }

    fn update_range(&self,
                    tab: &str,
                    start_row: usize,
                    start_col: usize,
                    values: Vec<Vec<String>>)
                    -> Result<(), RegistryError> {
        let height = values.len();
        let width = values.iter().map(Vec::len).max().unwrap_or(0);
        if height == 0 || width == 0 {
            return Ok(());
        }
        let range = format!("{}!{}{}:{}{}",
                            tab,
                            column_letter(start_col),
                            start_row,
                            column_letter(start_col + width - 1),
                            start_row + height - 1);
        let url = format!("{}?valueInputOption=RAW", self.values_url(&range));
        let body = json!({ "range": range, "values": values });
        let resp = self.http.put(&url).bearer_auth(&self.token).json(&body).send()?;
        if !resp.status().is_success() {
            return Err(RegistryError::Transport(format!("PUT {} -> {}", url, resp.status())));
        }
        Ok(())
    }

    fn append_row(&self, tab: &str, row: Vec<String>) -> Result<(), RegistryError> {
        let url = format!("{}:append?valueInputOption=USER_ENTERED&insertDataOption=INSERT_ROWS",
                          self.values_url(tab));
        self.post_json(&url, json!({ "values": [row] }))?;
        Ok(())
    }

    fn row_count(&self, tab: &str) -> Result<usize, RegistryError> {
        Ok(self.all_values(tab)?.len())
    }

    fn read_records(&self, tab: &str) -> Result<Vec<Registro>, RegistryError> {
        let rows = self.all_values(tab)?;
        if rows.is_empty() {
            return Ok(vec![]);
        }
        let headers = &rows[0];
        let mut out = Vec::with_capacity(rows.len() - 1);
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
    fn column_letters() {
        assert_eq!(column_letter(1), "A");
        assert_eq!(column_letter(8), "H");
        assert_eq!(column_letter(26), "Z");
        assert_eq!(column_letter(27), "AA");
    }
}
