//! Configuración central de la aplicación.
//!
//! Todo se lee del entorno una sola vez al arrancar y queda en una
//! estructura inmutable que viaja explícitamente a cada componente; ningún
//! módulo vuelve a consultar variables de entorno después.

use std::env;

use informe_adapters::GeneracionConfig;
use informe_registry::{init_dotenv, RegistryConfig};

use crate::generador::GeneracionError;

/// Configuración global: registro compartido, generación de documentos y el
/// token estático para los backends HTTP.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub registry: RegistryConfig,
    pub generacion: GeneracionConfig,
    /// Bearer token para la API de hojas y el almacén de archivos. Su
    /// obtención/renovación es externa a este sistema.
    pub api_token: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, GeneracionError> {
        init_dotenv();
        let registry = RegistryConfig::from_env().map_err(|e| GeneracionError::Configuracion(e.to_string()))?;
        Ok(Self { registry,
                  generacion: GeneracionConfig::from_env(),
                  api_token: env::var("GOOGLE_API_TOKEN").ok().filter(|t| !t.is_empty()) })
    }
}
