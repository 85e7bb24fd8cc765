//! Carga de configuración del registro desde variables de entorno.
//! Convención `GSHEET_*`; el `.env` se carga una sola vez.

use once_cell::sync::Lazy;
use std::env;

use dotenvy::dotenv;

use crate::error::RegistryError;

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenv(); // ignora error si no existe .env
});

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// ID del spreadsheet compartido.
    pub spreadsheet_id: String,
    /// Hoja de proyectos.
    pub tab_proyectos: String,
    /// Hoja nueva de informes (bitácora permanente).
    pub tab_informes: String,
    /// Hoja legada, consultada como fallback de lectura.
    pub tab_legacy: String,
    /// Hoja contador/turnero; se crea si no existe.
    pub tab_secuencia: String,
    /// Desfase horario fijo para los timestamps del registro (horas UTC;
    /// -5 corresponde a la zona del operador original).
    pub utc_offset_hours: i32,
}

impl RegistryConfig {
    /// Construye desde el entorno. `GSHEET_ID` es obligatorio: sin él no hay
    /// registro contra el cual operar.
    pub fn from_env() -> Result<Self, RegistryError> {
        Lazy::force(&DOTENV_LOADED);
        let spreadsheet_id = env::var("GSHEET_ID").ok().filter(|s| !s.is_empty()).ok_or_else(|| {
            RegistryError::Configuration(
                "GSHEET_ID no está configurado; define la variable de entorno con el ID del spreadsheet".into(),
            )
        })?;
        Ok(Self { spreadsheet_id,
                  tab_proyectos: env::var("GSHEET_TAB_PROYECTOS").unwrap_or_else(|_| "Proyectos".into()),
                  tab_informes: env::var("GSHEET_TAB_REPORTES").unwrap_or_else(|_| "Informes".into()),
                  tab_legacy: env::var("GSHEET_TAB").unwrap_or_else(|_| "Datos".into()),
                  tab_secuencia: env::var("REPORTS_SEQ_SHEET_NAME").unwrap_or_else(|_| "INFORMES_SEQ".into()),
                  utc_offset_hours: env::var("REPORTS_UTC_OFFSET").ok()
                                                                  .and_then(|v| v.parse().ok())
                                                                  .unwrap_or(-5) })
    }

    /// Configuración para pruebas y modo demo: nombres por defecto y un ID
    /// sintético.
    pub fn for_tests() -> Self {
        Self { spreadsheet_id: "test-spreadsheet".into(),
               tab_proyectos: "Proyectos".into(),
               tab_informes: "Informes".into(),
               tab_legacy: "Datos".into(),
               tab_secuencia: "INFORMES_SEQ".into(),
               utc_offset_hours: -5 }
    }
}
