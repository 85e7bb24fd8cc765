//! Etapa de render del documento.
//!
//! Plantilla + contexto → DOCX en la carpeta de salida. Falla terminalmente
//! ante plantilla ausente, marcador mal formado o error de guardado; el
//! consecutivo ya reservado no se revierte.

use std::fmt;
use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use informe_core::errors::EngineError;
use informe_core::stage::{StageKind, StageRunResultTyped, TypedStage};
use informe_domain::document_file_name;
use informe_render::{DocxTemplate, ImageEncoding, ImagenInline, ProcessedImage, TemplateContext};
use sha2::{Digest, Sha256};

use crate::artifacts::{ContextoArtifact, DocumentoArtifact};
use crate::config::GeneracionConfig;

pub struct RenderizarDocumentoStage {
    config: GeneracionConfig,
}

impl RenderizarDocumentoStage {
    pub const ID: &'static str = "renderizar_documento";

    pub fn new(config: GeneracionConfig) -> Self {
        Self { config }
    }
}

impl fmt::Debug for RenderizarDocumentoStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RenderizarDocumentoStage")
    }
}

fn fallo(msg: String) -> StageRunResultTyped<DocumentoArtifact> {
    StageRunResultTyped::Failure { error: EngineError::Internal(msg) }
}

impl TypedStage for RenderizarDocumentoStage {
    type Params = ();
    type Input = ContextoArtifact;
    type Output = DocumentoArtifact;

    fn id(&self) -> &'static str {
        Self::ID
    }

    fn kind(&self) -> StageKind {
        StageKind::Transform
    }

    fn run_typed(&self, input: Option<ContextoArtifact>, _params: ()) -> StageRunResultTyped<DocumentoArtifact> {
        let inp = match input {
            Some(v) => v,
            None => return StageRunResultTyped::Failure { error: EngineError::MissingInput },
        };

        if !self.config.template_path.exists() {
            return fallo(format!("configuración: no se encontró la plantilla DOCX: {}",
                                 self.config.template_path.display()));
        }
        let mut tpl = match DocxTemplate::load(&self.config.template_path) {
            Ok(t) => t,
            Err(e) => return fallo(format!("plantilla: {}", e)),
        };

        let mut ctx = TemplateContext::new();
        for (clave, valor) in inp.datos.campos() {
            ctx.insert_text(clave, valor);
        }
        ctx.insert_text("porcentaje_cumplimiento", &inp.porcentaje_display);

        let mut inline = Vec::with_capacity(inp.imagenes.len());
        for img in &inp.imagenes {
            let data = match BASE64.decode(&img.b64) {
                Ok(b) => b,
                Err(e) => return fallo(format!("imagen corrupta en el contexto: {}", e)),
            };
            let encoding = if img.encoding == "jpeg" { ImageEncoding::Jpeg } else { ImageEncoding::Png };
            inline.push(ImagenInline::from_processed(ProcessedImage { data,
                                                                      encoding,
                                                                      width: img.width,
                                                                      height: img.height },
                                                     None));
        }
        ctx.insert_image_list("imagenes", inline);

        let grafico = match ImagenInline::from_path(Path::new(&inp.ruta_grafico), Some(self.config.chart.width_mm)) {
            Ok(g) => g,
            Err(e) => return fallo(format!("gráfico: {}", e)),
        };
        ctx.insert_image("grafico_cumplimiento", grafico);

        let archivo_docx = document_file_name(&inp.numero_informe,
                                              inp.datos.nombre_base(),
                                              &inp.datos.cliente,
                                              &inp.datos.fecha);
        if let Err(e) = fs::create_dir_all(&self.config.output_dir) {
            return fallo(format!("carpeta de salida: {}", e));
        }
        let ruta = self.config.output_dir.join(&archivo_docx);

        if let Err(e) = tpl.render(&ctx) {
            return fallo(format!("error generando el DOCX: {}", e));
        }
        if let Err(e) = tpl.save(&ruta) {
            return fallo(format!("error guardando el DOCX: {}", e));
        }

        let sha256 = match fs::read(&ruta) {
            Ok(bytes) => {
                let mut hasher = Sha256::new();
                hasher.update(&bytes);
                format!("{:x}", hasher.finalize())
            }
            Err(e) => return fallo(format!("no se pudo releer el documento: {}", e)),
        };

        StageRunResultTyped::Success { outputs: vec![DocumentoArtifact { secuencia: inp.secuencia,
                                                                         numero_informe: inp.numero_informe,
                                                                         proyecto_id: inp.datos.proyecto_id.clone(),
                                                                         responsable: inp.datos.responsable.clone(),
                                                                         archivo_docx,
                                                                         ruta_docx: ruta.to_string_lossy()
                                                                                        .into_owned(),
                                                                         archivo_pdf: None,
                                                                         sha256,
                                                                         imagenes_incrustadas: inp.imagenes.len()
                                                                                               as u32,
                                                                         imagenes_omitidas: inp.omitidas,
                                                                         schema_version: 1 }] }
    }
}
