//! Etapa sumidero: registro en la bitácora permanente.
//!
//! Se ejecuta después de un render exitoso. Si el append falla, se registra
//! la advertencia y la corrida sigue reportando éxito: queda un documento
//! numerado sin rastro en la bitácora — ventana de inconsistencia conocida
//! y aceptada.

use std::fmt;

use informe_core::errors::EngineError;
use informe_core::stage::{StageKind, StageNote, StageRunResultTyped, TypedStage};
use informe_registry::{local_timestamp, Registry};
use log::warn;
use serde_json::json;

use crate::artifacts::{DocumentoArtifact, RegistroArtifact};

pub struct RegistrarInformeStage {
    registry: Registry,
}

impl RegistrarInformeStage {
    pub const ID: &'static str = "registrar_informe";

    pub fn new(registry: Registry) -> Self {
        Self { registry }
    }
}

impl fmt::Debug for RegistrarInformeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RegistrarInformeStage")
    }
}

impl TypedStage for RegistrarInformeStage {
    type Params = ();
    type Input = DocumentoArtifact;
    type Output = RegistroArtifact;

    fn id(&self) -> &'static str {
        Self::ID
    }

    fn kind(&self) -> StageKind {
        StageKind::Sink
    }

    fn run_typed(&self, input: Option<DocumentoArtifact>, _params: ()) -> StageRunResultTyped<RegistroArtifact> {
        let inp = match input {
            Some(v) => v,
            None => return StageRunResultTyped::Failure { error: EngineError::MissingInput },
        };

        let fecha_iso = local_timestamp(self.registry.config().utc_offset_hours);
        let resultado = self.registry
                            .append_report_entry(&inp.proyecto_id, &inp.numero_informe, &fecha_iso, &inp.responsable);

        let registrado = resultado.is_ok();
        let out = RegistroArtifact { secuencia: inp.secuencia,
                                     numero_informe: inp.numero_informe,
                                     archivo_docx: inp.archivo_docx,
                                     ruta_docx: inp.ruta_docx,
                                     archivo_pdf: inp.archivo_pdf,
                                     sha256: inp.sha256,
                                     registrado,
                                     imagenes_incrustadas: inp.imagenes_incrustadas,
                                     imagenes_omitidas: inp.imagenes_omitidas,
                                     schema_version: 1 };

        match resultado {
            Ok(()) => StageRunResultTyped::Success { outputs: vec![out] },
            Err(e) => {
                warn!("falló el registro del informe en la bitácora: {}", e);
                let nota = StageNote { note: "registro_no_anexado".into(),
                                       data: json!({"numero_informe": out.numero_informe, "motivo": e.to_string()}) };
                StageRunResultTyped::SuccessWithNotes { outputs: vec![out],
                                                        notes: vec![nota] }
            }
        }
    }
}
