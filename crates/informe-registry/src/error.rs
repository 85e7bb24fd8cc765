use thiserror::Error;

#[derive(Debug, Error)]
pub enum RegistryError {
    /// Falta configuración imprescindible (p. ej. el ID de la hoja). Fatal
    /// y sin reintento; el mensaje se muestra al llamador.
    #[error("configuración: {0}")]
    Configuration(String),

    /// El consecutivo calculado es inválido (< 1). Aborta la generación
    /// antes de escribir documento alguno.
    #[error("no se pudo calcular el consecutivo de informes: {0}")]
    Sequence(String),

    /// La hoja pedida no existe y no pudo crearse.
    #[error("hoja '{0}' no disponible: {1}")]
    Worksheet(String, String),

    /// Fallo de transporte hablando con el backend.
    #[error("transporte: {0}")]
    Transport(String),

    /// Respuesta del backend que no se pudo interpretar.
    #[error("respuesta inválida del backend: {0}")]
    BadResponse(String),
}

impl From<reqwest::Error> for RegistryError {
    fn from(e: reqwest::Error) -> Self {
        RegistryError::Transport(e.to_string())
    }
}
