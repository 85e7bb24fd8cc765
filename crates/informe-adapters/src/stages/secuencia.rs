//! Etapa de reserva de secuencia.
//!
//! Toma turno en el contador append-only y formatea el número de informe.
//! Un fallo aquí es terminal: aborta antes de escribir documento alguno.
//! Una vez reservado, el consecutivo no se devuelve jamás — un fallo
//! posterior deja un hueco aceptado en la numeración.

use std::fmt;

use informe_core::errors::EngineError;
use informe_core::stage::{StageKind, StageRunResultTyped, TypedStage};
use informe_domain::format_report_number;
use informe_registry::Registry;

use crate::artifacts::{DatosArtifact, SecuenciaArtifact};

/// Responsable por defecto cuando el campo llega en blanco.
const SIN_RESPONSABLE: &str = "SIN_RESPONSABLE";

pub struct ReservarSecuenciaStage {
    registry: Registry,
    prefix: String,
    pad: usize,
}

impl ReservarSecuenciaStage {
    pub const ID: &'static str = "reservar_secuencia";

    pub fn new(registry: Registry, prefix: String, pad: usize) -> Self {
        Self { registry, prefix, pad }
    }
}

impl fmt::Debug for ReservarSecuenciaStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ReservarSecuenciaStage")
    }
}

impl TypedStage for ReservarSecuenciaStage {
    type Params = ();
    type Input = DatosArtifact;
    type Output = SecuenciaArtifact;

    fn id(&self) -> &'static str {
        Self::ID
    }

    fn kind(&self) -> StageKind {
        StageKind::Transform
    }

    fn run_typed(&self, input: Option<DatosArtifact>, _params: ()) -> StageRunResultTyped<SecuenciaArtifact> {
        let inp = match input {
            Some(v) => v,
            None => return StageRunResultTyped::Failure { error: EngineError::MissingInput },
        };

        let responsable = {
            let r = inp.datos.responsable.trim();
            if r.is_empty() { SIN_RESPONSABLE } else { r }
        };

        let secuencia = match self.registry.reserve_sequence(responsable, &inp.datos.proyecto_id) {
            Ok(seq) => seq,
            Err(e) => return StageRunResultTyped::Failure { error: EngineError::Internal(e.to_string()) },
        };

        let numero_informe = format_report_number(secuencia, &self.prefix, self.pad);
        let mut datos = inp.datos;
        datos.numero_informe = numero_informe.clone();

        StageRunResultTyped::Success { outputs: vec![SecuenciaArtifact { datos,
                                                                         imagenes_crudas: inp.imagenes_crudas,
                                                                         secuencia,
                                                                         numero_informe,
                                                                         schema_version: 1 }] }
    }
}
