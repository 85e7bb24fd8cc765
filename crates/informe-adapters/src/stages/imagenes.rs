//! Etapa de resolución de imágenes.
//!
//! Normaliza IDs/URLs y descarga los binarios. Nunca falla terminalmente:
//! cada descarga fallida queda como nota y el flujo continúa con el set
//! parcial que haya llegado.

use std::fmt;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use informe_core::errors::EngineError;
use informe_core::stage::{StageKind, StageNote, StageRunResultTyped, TypedStage};
use informe_files::{download_each, normalize_ids, Descarga, FileStore};
use serde_json::json;

use crate::artifacts::{ImagenesArtifact, SecuenciaArtifact};

pub struct ResolverImagenesStage {
    files: Arc<dyn FileStore>,
}

impl ResolverImagenesStage {
    pub const ID: &'static str = "resolver_imagenes";

    pub fn new(files: Arc<dyn FileStore>) -> Self {
        Self { files }
    }
}

impl fmt::Debug for ResolverImagenesStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ResolverImagenesStage")
    }
}

impl TypedStage for ResolverImagenesStage {
    type Params = ();
    type Input = SecuenciaArtifact;
    type Output = ImagenesArtifact;

    fn id(&self) -> &'static str {
        Self::ID
    }

    fn kind(&self) -> StageKind {
        StageKind::Transform
    }

    fn run_typed(&self, input: Option<SecuenciaArtifact>, _params: ()) -> StageRunResultTyped<ImagenesArtifact> {
        let inp = match input {
            Some(v) => v,
            None => return StageRunResultTyped::Failure { error: EngineError::MissingInput },
        };

        let ids = normalize_ids(&inp.imagenes_crudas);
        let mut imagenes_b64 = Vec::with_capacity(ids.len());
        let mut notes = Vec::new();
        for resultado in download_each(self.files.as_ref(), &ids) {
            match resultado {
                Descarga::Ok(bytes) => imagenes_b64.push(BASE64.encode(bytes)),
                Descarga::Omitida { id, motivo } => {
                    notes.push(StageNote { note: "imagen_omitida".into(),
                                           data: json!({"id": id, "motivo": motivo}) });
                }
            }
        }

        let omitidas = notes.len() as u32;
        let out = ImagenesArtifact { datos: inp.datos,
                                     secuencia: inp.secuencia,
                                     numero_informe: inp.numero_informe,
                                     imagenes_b64,
                                     omitidas,
                                     schema_version: 1 };
        if notes.is_empty() {
            StageRunResultTyped::Success { outputs: vec![out] }
        } else {
            StageRunResultTyped::SuccessWithNotes { outputs: vec![out], notes }
        }
    }
}
