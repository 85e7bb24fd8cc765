//! Conversión DOCX→PDF de mejor esfuerzo.
//!
//! Se invoca LibreOffice sin cabeza como proceso externo; si ningún binario
//! candidato está disponible o la conversión falla, se registra y se sigue
//! sin PDF. Nunca bloquea el flujo de generación.

use std::path::{Path, PathBuf};
use std::process::Command;

use log::{info, warn};

/// Modo de conversión, tomado de `PDF_ENABLED` (`auto` | `on` | `off`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfMode {
    Auto,
    On,
    Off,
}

impl PdfMode {
    pub fn from_env_value(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "on" => PdfMode::On,
            "off" => PdfMode::Off,
            _ => PdfMode::Auto,
        }
    }
}

const SOFFICE_CANDIDATES: [&str; 3] = ["soffice", "libreoffice", "/usr/bin/soffice"];

/// Intenta producir `<docx>.pdf` junto al DOCX. Devuelve la ruta del PDF si
/// existe al terminar; `None` en cualquier otro caso.
pub fn convert_to_pdf(docx_path: &Path, mode: PdfMode) -> Option<PathBuf> {
    if mode == PdfMode::Off {
        return None;
    }

    let pdf_path = docx_path.with_extension("pdf");
    let outdir = docx_path.parent().unwrap_or_else(|| Path::new("."));

    for soffice in SOFFICE_CANDIDATES {
        let result = Command::new(soffice).arg("--headless")
                                          .arg("--convert-to")
                                          .arg("pdf")
                                          .arg("--outdir")
                                          .arg(outdir)
                                          .arg(docx_path)
                                          .output();
        match result {
            Ok(output) if output.status.success() && pdf_path.exists() => {
                info!("PDF generado via {}: {}", soffice, pdf_path.display());
                return Some(pdf_path);
            }
            Ok(output) => {
                warn!("{} no produjo PDF (status {})", soffice, output.status);
            }
            Err(e) => {
                // Binario ausente: probar el siguiente candidato.
                warn!("{} no disponible: {}", soffice, e);
            }
        }
    }

    warn!("no se pudo generar PDF para {}", docx_path.display());
    None
}
