use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("imagen ilegible: {0}")]
    Image(String),

    #[error("gráfico: {0}")]
    Chart(String),

    #[error("contenedor docx: {0}")]
    Container(String),

    /// Marcador mal formado o parte faltante en la plantilla. Fatal para la
    /// solicitud en curso; no se reintenta.
    #[error("plantilla: {0}")]
    Template(String),
}
