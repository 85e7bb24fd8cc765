//! Fachada de generación de informes.
//!
//! Ejecuta el pipeline completo de una solicitud y traduce el resultado del
//! motor a la respuesta del llamador: número asignado, archivos producidos
//! y advertencias de degradación (imágenes omitidas, PDF ausente, bitácora
//! no anexada). Los fallos terminales se clasifican según su origen.

use std::sync::Arc;

use informe_adapters::{build_engine, RegistroArtifact, Solicitud, StageDeps};
use informe_core::model::ArtifactSpec;
use informe_core::{InMemoryEventStore, InMemoryPipelineRepository, PipelineEngine, PipelineEventKind};
use informe_domain::{DatosInforme, Registro};
use informe_files::{FileStore, HttpFileStore};
use informe_registry::{Registry, RegistryError, RestSheetClient};
use log::info;
use thiserror::Error;
use uuid::Uuid;

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum GeneracionError {
    /// Falta configuración imprescindible (ID del registro, plantilla).
    #[error("configuración: {0}")]
    Configuracion(String),

    /// La reserva del consecutivo falló; no se escribió documento alguno.
    #[error("secuencia: {0}")]
    Secuencia(String),

    /// El recurso pedido no existe en el registro.
    #[error("no encontrado: {0}")]
    NoEncontrado(String),

    /// Error leyendo el registro compartido.
    #[error("registro: {0}")]
    Registro(String),

    /// Render del documento o del gráfico; el consecutivo reservado no se
    /// revierte.
    #[error("render: {0}")]
    Render(String),

    /// Fallo interno del motor.
    #[error("motor: {0}")]
    Motor(String),
}

/// Respuesta de una generación exitosa.
#[derive(Debug, Clone)]
pub struct ResultadoGeneracion {
    pub run_id: Uuid,
    pub secuencia: u64,
    pub numero_informe: String,
    pub archivo_docx: String,
    pub ruta_docx: String,
    pub archivo_pdf: Option<String>,
    pub sha256: String,
    pub registrado: bool,
    pub imagenes_incrustadas: u32,
    pub imagenes_omitidas: u32,
    /// Degradaciones no fatales, como pares `etapa: nota`.
    pub advertencias: Vec<String>,
}

/// Servicio de generación: clientes ya construidos + configuración.
pub struct GeneradorInformes {
    deps: StageDeps,
}

impl GeneradorInformes {
    pub fn new(registry: Registry, files: Arc<dyn FileStore>, config: informe_adapters::GeneracionConfig) -> Self {
        Self { deps: StageDeps::new(registry, files, config) }
    }

    /// Construcción contra los backends HTTP reales usando la configuración
    /// del proceso. Requiere el token estático del entorno.
    pub fn desde_entorno(app: &AppConfig) -> Result<Self, GeneracionError> {
        let token = app.api_token
                       .as_deref()
                       .ok_or_else(|| GeneracionError::Configuracion("GOOGLE_API_TOKEN no está configurado".into()))?;
        let sheets = RestSheetClient::new(&app.registry.spreadsheet_id, token)
            .map_err(|e| GeneracionError::Configuracion(e.to_string()))?;
        let files = HttpFileStore::new(token).map_err(|e| GeneracionError::Configuracion(e.to_string()))?;
        let registry = Registry::new(Arc::new(sheets), app.registry.clone());
        Ok(Self::new(registry, Arc::new(files), app.generacion.clone()))
    }

    /// Proyectos disponibles para el selector.
    pub fn proyectos(&self) -> Result<Vec<Registro>, GeneracionError> {
        self.deps.registry.list_projects().map_err(registro_error)
    }

    /// Datos combinados Proyecto+Informe de un informe almacenado, para
    /// previsualización.
    pub fn previsualizar(&self, id_informe: &str) -> Result<DatosInforme, GeneracionError> {
        let fila = self.deps
                       .registry
                       .get_report_by_id(id_informe)
                       .map_err(registro_error)?
                       .ok_or_else(|| {
                           GeneracionError::NoEncontrado(format!("id_informe={} en las hojas configuradas",
                                                                 id_informe))
                       })?;
        let proyecto_id = fila.get("proyecto_id").map(|v| v.trim().to_string()).unwrap_or_default();
        let proyecto = if proyecto_id.is_empty() {
            None
        } else {
            self.deps.registry.get_project_by_id(&proyecto_id).unwrap_or_default()
        };
        Ok(DatosInforme::from_registros(proyecto.as_ref(), &fila))
    }

    /// Corre el flujo completo para la solicitud dada.
    pub fn generar(&self, solicitud: Solicitud) -> Result<ResultadoGeneracion, GeneracionError> {
        let mut engine = build_engine(&self.deps, solicitud);
        let run_id = match engine.run() {
            Ok(id) => id,
            Err(_) => return Err(clasificar_fallo(&engine)),
        };

        let fin = resultado_final(&engine, run_id)?;
        let advertencias = engine.notes_for(run_id)
                                 .into_iter()
                                 .map(|(stage, nota)| format!("{}: {}", stage, nota))
                                 .collect();

        info!("informe {} generado ({} imágenes, {} omitidas)",
              fin.numero_informe, fin.imagenes_incrustadas, fin.imagenes_omitidas);

        Ok(ResultadoGeneracion { run_id,
                                 secuencia: fin.secuencia,
                                 numero_informe: fin.numero_informe,
                                 archivo_docx: fin.archivo_docx,
                                 ruta_docx: fin.ruta_docx,
                                 archivo_pdf: fin.archivo_pdf,
                                 sha256: fin.sha256,
                                 registrado: fin.registrado,
                                 imagenes_incrustadas: fin.imagenes_incrustadas,
                                 imagenes_omitidas: fin.imagenes_omitidas,
                                 advertencias })
    }
}

fn registro_error(e: RegistryError) -> GeneracionError {
    match e {
        RegistryError::Configuration(m) => GeneracionError::Configuracion(m),
        RegistryError::Sequence(m) => GeneracionError::Secuencia(m),
        otra => GeneracionError::Registro(otra.to_string()),
    }
}

/// Decodifica el artifact de cierre de la corrida.
fn resultado_final(engine: &PipelineEngine<InMemoryEventStore, InMemoryPipelineRepository>,
                   run_id: Uuid)
                   -> Result<RegistroArtifact, GeneracionError> {
    let hash = engine.events_for(run_id)
                     .iter()
                     .rev()
                     .find_map(|e| match &e.kind {
                         PipelineEventKind::StageFinished { stage_id, outputs, .. }
                             if stage_id == informe_adapters::stages::RegistrarInformeStage::ID =>
                         {
                             outputs.first().cloned()
                         }
                         _ => None,
                     })
                     .ok_or_else(|| GeneracionError::Motor("la corrida no produjo artifact de cierre".into()))?;
    let artifact = engine.get_artifact(&hash)
                         .ok_or_else(|| GeneracionError::Motor("artifact de cierre no almacenado".into()))?;
    RegistroArtifact::from_artifact(artifact).map_err(|e| GeneracionError::Motor(e.to_string()))
}

/// Clasifica el fallo terminal según la etapa que lo emitió.
fn clasificar_fallo(engine: &PipelineEngine<InMemoryEventStore, InMemoryPipelineRepository>) -> GeneracionError {
    use informe_adapters::stages::{ConstruirContextoStage, RenderizarDocumentoStage, ReservarSecuenciaStage,
                                   ResolverDatosStage};

    let fallo = engine.events()
                      .unwrap_or_default()
                      .into_iter()
                      .rev()
                      .find_map(|e| match e.kind {
                          PipelineEventKind::StageFailed { stage_id, error, .. } => Some((stage_id, error)),
                          _ => None,
                      });

    let (stage_id, error) = match fallo {
        Some(f) => f,
        None => return GeneracionError::Motor("fallo terminal sin evento StageFailed".into()),
    };
    let mensaje = error.to_string();

    match stage_id.as_str() {
        id if id == ResolverDatosStage::ID => {
            if mensaje.contains("no se encontró") {
                GeneracionError::NoEncontrado(mensaje)
            } else {
                GeneracionError::Registro(mensaje)
            }
        }
        id if id == ReservarSecuenciaStage::ID => {
            if mensaje.contains("configuración") {
                GeneracionError::Configuracion(mensaje)
            } else {
                GeneracionError::Secuencia(mensaje)
            }
        }
        id if id == ConstruirContextoStage::ID => GeneracionError::Render(mensaje),
        id if id == RenderizarDocumentoStage::ID => {
            if mensaje.contains("configuración") {
                GeneracionError::Configuracion(mensaje)
            } else {
                GeneracionError::Render(mensaje)
            }
        }
        _ => GeneracionError::Motor(mensaje),
    }
}
