//! Descarga de binarios del almacén de archivos.

use std::collections::HashMap;
use std::io::Read;
use std::sync::Mutex;
use std::time::Duration;

use log::warn;
use reqwest::blocking::Client;

use crate::error::FileStoreError;

/// Acceso de lectura al almacén: binario por identificador.
pub trait FileStore: Send + Sync {
    fn fetch(&self, file_id: &str) -> Result<Vec<u8>, FileStoreError>;
}

/// Resultado por archivo: el binario, o el motivo por el que se omitió.
#[derive(Debug, Clone)]
pub enum Descarga {
    Ok(Vec<u8>),
    Omitida { id: String, motivo: String },
}

/// Descarga cada identificador. Cualquier fallo individual (permiso,
/// inexistente, transitorio) se registra y queda como `Omitida`; no hay
/// reintentos y ningún fallo aborta la lista.
pub fn download_each(store: &dyn FileStore, file_ids: &[String]) -> Vec<Descarga> {
    let mut resultados = Vec::with_capacity(file_ids.len());
    for fid in file_ids {
        if fid.is_empty() {
            continue;
        }
        match store.fetch(fid) {
            Ok(data) => resultados.push(Descarga::Ok(data)),
            Err(e) => {
                warn!("imagen {} omitida: {}", fid, e);
                resultados.push(Descarga::Omitida { id: fid.clone(),
                                                    motivo: e.to_string() });
            }
        }
    }
    resultados
}

/// Variante colapsada: sólo los contenidos que llegaron, en orden.
pub fn download_all(store: &dyn FileStore, file_ids: &[String]) -> Vec<Vec<u8>> {
    download_each(store, file_ids).into_iter()
                                  .filter_map(|d| match d {
                                      Descarga::Ok(data) => Some(data),
                                      Descarga::Omitida { .. } => None,
                                  })
                                  .collect()
}

/// Almacén en memoria para tests y modo demo.
#[derive(Default)]
pub struct InMemoryFileStore {
    files: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, file_id: &str, data: Vec<u8>) -> Self {
        {
            let mut files = self.files.lock().expect("archivos envenenados");
            files.insert(file_id.to_string(), data);
        }
        self
    }
}

impl FileStore for InMemoryFileStore {
    fn fetch(&self, file_id: &str) -> Result<Vec<u8>, FileStoreError> {
        let files = self.files
                        .lock()
                        .map_err(|_| FileStoreError::Transport("lock envenenado".into()))?;
        files.get(file_id)
             .cloned()
             .ok_or_else(|| FileStoreError::NotFound(file_id.to_string()))
    }
}

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/drive/v3";
const CHUNK: usize = 64 * 1024;

/// Cliente HTTP bloqueante con descarga en trozos (`alt=media`). El token es
/// estático; su renovación queda fuera de este sistema.
pub struct HttpFileStore {
    http: Client,
    base_url: String,
    token: String,
}

impl HttpFileStore {
    pub fn new(token: &str) -> Result<Self, FileStoreError> {
        Self::with_base_url(token, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(token: &str, base_url: &str) -> Result<Self, FileStoreError> {
        let http = Client::builder().timeout(Duration::from_secs(60))
                                    .build()
                                    .map_err(|e| FileStoreError::Transport(e.to_string()))?;
        Ok(Self { http,
                  base_url: base_url.trim_end_matches('/').to_string(),
                  token: token.to_string() })
    }
}

impl FileStore for HttpFileStore {
    fn fetch(&self, file_id: &str) -> Result<Vec<u8>, FileStoreError> {
        let url = format!("{}/files/{}?alt=media", self.base_url, file_id);
        let resp = self.http
                       .get(&url)
                       .bearer_auth(&self.token)
                       .send()
                       .map_err(|e| FileStoreError::Transport(e.to_string()))?;
        match resp.status().as_u16() {
            403 => return Err(FileStoreError::PermissionDenied(file_id.to_string())),
            404 => return Err(FileStoreError::NotFound(file_id.to_string())),
            s if !(200..300).contains(&s) => {
                return Err(FileStoreError::Transport(format!("GET {} -> {}", url, s)))
            }
            _ => {}
        }
        // Lectura en trozos hasta agotar el cuerpo.
        let mut reader = resp;
        let mut out = Vec::new();
        let mut buf = vec![0u8; CHUNK];
        loop {
            let n = reader.read(&mut buf).map_err(|e| FileStoreError::Transport(e.to_string()))?;
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn download_all_skips_failures_and_keeps_order() {
        let store = InMemoryFileStore::new().with_file("uno", vec![1])
                                            .with_file("tres", vec![3]);
        let ids = vec!["uno".to_string(), "dos".to_string(), "tres".to_string()];
        let blobs = download_all(&store, &ids);
        assert_eq!(blobs, vec![vec![1], vec![3]]);
    }

    #[test]
    fn download_all_empty_input_yields_empty_output() {
        let store = InMemoryFileStore::new();
        assert!(download_all(&store, &[]).is_empty());
    }
}
