//! Etapa fuente: resolver los datos del informe.
//!
//! Carga la fila de informe (almacenada o directa), enriquece con la fila
//! del proyecto si hay `proyecto_id` y fusiona (informe pisa proyecto). La
//! ausencia de proyecto no es error: queda proyecto vacío. No encontrar un
//! `id_informe` pedido sí es terminal: no hay nada que generar.

use std::fmt;

use informe_core::stage::{StageKind, StageNote, StageRunResultTyped, TypedStage};
use informe_core::errors::EngineError;
use informe_domain::DatosInforme;
use informe_registry::Registry;
use log::warn;
use serde_json::json;

use crate::artifacts::DatosArtifact;
use crate::flujo::Solicitud;

pub struct ResolverDatosStage {
    registry: Registry,
    solicitud: Solicitud,
}

impl ResolverDatosStage {
    pub const ID: &'static str = "resolver_datos";

    pub fn new(registry: Registry, solicitud: Solicitud) -> Self {
        Self { registry, solicitud }
    }
}

impl fmt::Debug for ResolverDatosStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResolverDatosStage")
    }
}

impl TypedStage for ResolverDatosStage {
    type Params = ();
    type Input = DatosArtifact; // ignorado (Source)
    type Output = DatosArtifact;

    fn id(&self) -> &'static str {
        Self::ID
    }

    fn kind(&self) -> StageKind {
        StageKind::Source
    }

    fn run_typed(&self, _input: Option<DatosArtifact>, _params: ()) -> StageRunResultTyped<DatosArtifact> {
        let registro_informe = match &self.solicitud {
            Solicitud::PorId { id_informe } => match self.registry.get_report_by_id(id_informe) {
                Ok(Some(r)) => r,
                Ok(None) => {
                    return StageRunResultTyped::Failure {
                        error: EngineError::Internal(format!(
                            "no se encontró id_informe={} en las hojas configuradas", id_informe)),
                    }
                }
                Err(e) => {
                    return StageRunResultTyped::Failure {
                        error: EngineError::Internal(format!("error al leer el registro: {}", e)),
                    }
                }
            },
            Solicitud::Directa { informe } => informe.to_registro(),
        };

        let proyecto_id = registro_informe.get("proyecto_id")
                                          .map(|v| v.trim().to_string())
                                          .unwrap_or_default();

        // El proyecto es opcional: ausencia o fallo de lectura dejan el
        // proyecto vacío y el flujo continúa.
        let mut notes = Vec::new();
        let registro_proyecto = if proyecto_id.is_empty() {
            None
        } else {
            match self.registry.get_project_by_id(&proyecto_id) {
                Ok(p) => p,
                Err(e) => {
                    warn!("proyecto {} no resuelto: {}", proyecto_id, e);
                    notes.push(StageNote { note: "proyecto_no_resuelto".into(),
                                           data: json!({"proyecto_id": proyecto_id, "motivo": e.to_string()}) });
                    None
                }
            }
        };

        let datos = DatosInforme::from_registros(registro_proyecto.as_ref(), &registro_informe);
        let imagenes_crudas: Vec<String> = registro_informe.get("imagenes_drive_ids")
                                                           .map(|s| {
                                                               s.split(',')
                                                                .map(str::trim)
                                                                .filter(|s| !s.is_empty())
                                                                .map(str::to_string)
                                                                .collect()
                                                           })
                                                           .unwrap_or_default();

        let out = DatosArtifact { datos,
                                  imagenes_crudas,
                                  schema_version: 1 };
        if notes.is_empty() {
            StageRunResultTyped::Success { outputs: vec![out] }
        } else {
            StageRunResultTyped::SuccessWithNotes { outputs: vec![out], notes }
        }
    }
}
