//! Operaciones de alto nivel sobre las tablas del registro.

use std::sync::Arc;

use informe_domain::Registro;
use log::debug;

use crate::config::RegistryConfig;
use crate::error::RegistryError;
use crate::sheet::SheetClient;

/// Cabeceras de la bitácora permanente de informes.
pub const REPORT_LOG_HEADERS: [&str; 4] = ["proyecto_id", "id_informe", "fecha", "responsable"];

/// Cabeceras del contador de secuencia.
pub const SEQUENCE_HEADERS: [&str; 3] = ["timestamp", "responsable", "proyecto_id"];

/// Fachada sobre un `SheetClient` con los nombres de hoja configurados.
#[derive(Clone)]
pub struct Registry {
    client: Arc<dyn SheetClient>,
    config: RegistryConfig,
}

impl Registry {
    pub fn new(client: Arc<dyn SheetClient>, config: RegistryConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn client(&self) -> &Arc<dyn SheetClient> {
        &self.client
    }

    /// Crea la hoja si no existe y asegura cabeceras exactas en la fila 1.
    pub fn ensure_headers(&self, tab: &str, headers: &[&str]) -> Result<(), RegistryError> {
        self.client.ensure_worksheet(tab)?;
        let first = self.client.first_row(tab)?;
        if first.is_empty() {
            let fila: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
            self.client.update_range(tab, 1, 1, vec![fila])?;
        }
        Ok(())
    }

    /// Todos los proyectos de la hoja `Proyectos`.
    pub fn list_projects(&self) -> Result<Vec<Registro>, RegistryError> {
        self.client.read_records(&self.config.tab_proyectos)
    }

    /// Busca un proyecto por `proyecto_id`. `None` para id vacío o ausente.
    pub fn get_project_by_id(&self, proyecto_id: &str) -> Result<Option<Registro>, RegistryError> {
        let buscado = proyecto_id.trim();
        if buscado.is_empty() {
            return Ok(None);
        }
        let rows = self.list_projects()?;
        Ok(rows.into_iter()
               .find(|r| r.get("proyecto_id").map(|v| v.trim()) == Some(buscado)))
    }

    /// Busca un informe por `id_informe` en la hoja nueva y, si no aparece,
    /// en la hoja legada (retrocompatibilidad durante la migración).
    pub fn get_report_by_id(&self, id_informe: &str) -> Result<Option<Registro>, RegistryError> {
        let buscado = id_informe.trim();
        if let Some(r) = self.find_in_tab(&self.config.tab_informes, buscado)? {
            return Ok(Some(r));
        }
        debug!("id_informe={} no está en '{}', probando hoja legada '{}'",
               buscado, self.config.tab_informes, self.config.tab_legacy);
        self.find_in_tab(&self.config.tab_legacy, buscado)
    }

    fn find_in_tab(&self, tab: &str, id_informe: &str) -> Result<Option<Registro>, RegistryError> {
        let rows = match self.client.read_records(tab) {
            Ok(r) => r,
            // La hoja legada puede no existir; eso no es un error de lectura.
            Err(RegistryError::Worksheet(..)) => return Ok(None),
            Err(e) => return Err(e),
        };
        Ok(rows.into_iter()
               .find(|r| r.get("id_informe").map(|v| v.trim()) == Some(id_informe)))
    }

    /// Anexa la entrada permanente de la bitácora de informes:
    /// `proyecto_id | id_informe | fecha | responsable`.
    pub fn append_report_entry(&self,
                               proyecto_id: &str,
                               id_informe: &str,
                               fecha_iso: &str,
                               responsable: &str)
                               -> Result<(), RegistryError> {
        self.ensure_headers(&self.config.tab_informes, &REPORT_LOG_HEADERS)?;
        self.client.append_row(&self.config.tab_informes,
                               vec![proyecto_id.to_string(),
                                    id_informe.to_string(),
                                    fecha_iso.to_string(),
                                    responsable.to_string()])
    }

    /// Inserta un proyecto respetando el orden de columnas vigente de la
    /// hoja `Proyectos`. Requiere permiso de escritura.
    pub fn add_project(&self, proyecto: &Registro) -> Result<String, RegistryError> {
        let headers = self.client.first_row(&self.config.tab_proyectos)?;
        let fila: Vec<String> = headers.iter()
                                       .map(|h| proyecto.get(h).cloned().unwrap_or_default())
                                       .collect();
        self.client.append_row(&self.config.tab_proyectos, fila)?;
        Ok(proyecto.get("proyecto_id").cloned().unwrap_or_default())
    }
}
