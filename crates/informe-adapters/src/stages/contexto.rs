//! Etapa de construcción de contexto.
//!
//! Reprocesa cada imagen (reescala + re-codifica) y genera el gráfico de
//! cumplimiento. Una imagen ilegible se descarta con nota; que el gráfico
//! no pueda escribirse sí es terminal — es la única causa fatal de esta
//! etapa.

use std::fmt;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use informe_core::errors::EngineError;
use informe_core::stage::{StageKind, StageNote, StageRunResultTyped, TypedStage};
use informe_domain::safe_filename;
use informe_render::{render_compliance_chart, reprocess_image};
use log::warn;
use serde_json::json;

use crate::artifacts::{ContextoArtifact, ImagenProcesadaJson, ImagenesArtifact};
use crate::config::GeneracionConfig;

pub struct ConstruirContextoStage {
    config: GeneracionConfig,
}

impl ConstruirContextoStage {
    pub const ID: &'static str = "construir_contexto";

    pub fn new(config: GeneracionConfig) -> Self {
        Self { config }
    }
}

impl fmt::Debug for ConstruirContextoStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConstruirContextoStage")
    }
}

impl TypedStage for ConstruirContextoStage {
    type Params = ();
    type Input = ImagenesArtifact;
    type Output = ContextoArtifact;

    fn id(&self) -> &'static str {
        Self::ID
    }

    fn kind(&self) -> StageKind {
        StageKind::Transform
    }

    fn run_typed(&self, input: Option<ImagenesArtifact>, _params: ()) -> StageRunResultTyped<ContextoArtifact> {
        let inp = match input {
            Some(v) => v,
            None => return StageRunResultTyped::Failure { error: EngineError::MissingInput },
        };

        let mut imagenes = Vec::with_capacity(inp.imagenes_b64.len());
        let mut notes = Vec::new();
        for (idx, b64) in inp.imagenes_b64.iter().enumerate() {
            let bytes = match BASE64.decode(b64) {
                Ok(b) => b,
                Err(e) => {
                    warn!("imagen {} descartada del contexto: {}", idx, e);
                    notes.push(StageNote { note: "imagen_descartada".into(),
                                           data: json!({"indice": idx, "motivo": e.to_string()}) });
                    continue;
                }
            };
            match reprocess_image(&bytes, self.config.image_max_width) {
                Ok(p) => imagenes.push(ImagenProcesadaJson { b64: BASE64.encode(&p.data),
                                                             encoding: p.encoding.extension().to_string(),
                                                             width: p.width,
                                                             height: p.height }),
                Err(e) => {
                    warn!("imagen {} descartada del contexto: {}", idx, e);
                    notes.push(StageNote { note: "imagen_descartada".into(),
                                           data: json!({"indice": idx, "motivo": e.to_string()}) });
                }
            }
        }

        let porcentaje = inp.datos.porcentaje();
        let base = if inp.datos.id_informe.is_empty() {
            "cumplimiento_tmp".to_string()
        } else {
            format!("cumplimiento_{}", safe_filename(&inp.datos.id_informe))
        };
        let ruta_grafico =
            match render_compliance_chart(porcentaje, &base, &self.config.output_dir, &self.config.chart) {
                Ok(p) => p.to_string_lossy().into_owned(),
                Err(e) => {
                    return StageRunResultTyped::Failure { error: EngineError::Internal(format!("gráfico: {}", e)) }
                }
            };

        let omitidas = inp.omitidas + notes.len() as u32;
        let out = ContextoArtifact { datos: inp.datos,
                                     secuencia: inp.secuencia,
                                     numero_informe: inp.numero_informe,
                                     imagenes,
                                     omitidas,
                                     ruta_grafico,
                                     porcentaje_display: format!("{:.0}", porcentaje),
                                     schema_version: 1 };
        if notes.is_empty() {
            StageRunResultTyped::Success { outputs: vec![out] }
        } else {
            StageRunResultTyped::SuccessWithNotes { outputs: vec![out], notes }
        }
    }
}
