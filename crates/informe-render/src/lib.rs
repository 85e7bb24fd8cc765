//! informe-render: materialización del documento.
//!
//! Reprocesado de imágenes (reescala + re-codificación), gráfico de
//! cumplimiento rasterizado, motor de plantillas DOCX sobre el contenedor
//! OPC y conversión a PDF de mejor esfuerzo.

pub mod chart;
pub mod docx;
pub mod error;
pub mod imagen;
pub mod pdf;

pub use chart::{render_compliance_chart, ChartOptions};
pub use docx::{DocxTemplate, ImagenInline, TemplateContext, TemplateValue};
pub use error::RenderError;
pub use imagen::{reprocess_image, ImageEncoding, ProcessedImage};
pub use pdf::{convert_to_pdf, PdfMode};
