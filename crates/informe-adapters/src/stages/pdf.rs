//! Etapa de conversión a PDF (mejor esfuerzo).
//!
//! La ausencia de PDF degrada a "sin PDF" con nota; nunca detiene el flujo
//! ni impide el registro posterior.

use std::fmt;
use std::path::Path;

use informe_core::errors::EngineError;
use informe_core::stage::{StageKind, StageNote, StageRunResultTyped, TypedStage};
use informe_render::{convert_to_pdf, PdfMode};
use serde_json::json;

use crate::artifacts::DocumentoArtifact;

pub struct ConvertirPdfStage {
    mode: PdfMode,
}

impl ConvertirPdfStage {
    pub const ID: &'static str = "convertir_pdf";

    pub fn new(mode: PdfMode) -> Self {
        Self { mode }
    }
}

impl fmt::Debug for ConvertirPdfStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConvertirPdfStage")
    }
}

impl TypedStage for ConvertirPdfStage {
    type Params = ();
    type Input = DocumentoArtifact;
    type Output = DocumentoArtifact;

    fn id(&self) -> &'static str {
        Self::ID
    }

    fn kind(&self) -> StageKind {
        StageKind::Transform
    }

    fn run_typed(&self, input: Option<DocumentoArtifact>, _params: ()) -> StageRunResultTyped<DocumentoArtifact> {
        let mut inp = match input {
            Some(v) => v,
            None => return StageRunResultTyped::Failure { error: EngineError::MissingInput },
        };

        match convert_to_pdf(Path::new(&inp.ruta_docx), self.mode) {
            Some(pdf) => {
                inp.archivo_pdf = pdf.file_name().map(|n| n.to_string_lossy().into_owned());
                StageRunResultTyped::Success { outputs: vec![inp] }
            }
            None if self.mode == PdfMode::Off => StageRunResultTyped::Success { outputs: vec![inp] },
            None => {
                let nota = StageNote { note: "pdf_no_generado".into(),
                                       data: json!({"docx": inp.archivo_docx}) };
                StageRunResultTyped::SuccessWithNotes { outputs: vec![inp],
                                                        notes: vec![nota] }
            }
        }
    }
}
