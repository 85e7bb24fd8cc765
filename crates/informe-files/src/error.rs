use thiserror::Error;

#[derive(Debug, Error)]
pub enum FileStoreError {
    #[error("archivo no encontrado: {0}")]
    NotFound(String),
    #[error("sin permiso para leer: {0}")]
    PermissionDenied(String),
    #[error("transporte: {0}")]
    Transport(String),
}
