//! Plantillas DOCX.
//!
//! Un DOCX es un contenedor OPC (ZIP) con partes XML. `container` lee y
//! escribe ese contenedor con entradas deflate; `template` sustituye
//! marcadores `{{ clave }}` en `word/document.xml` e incrusta imágenes como
//! dibujos inline (parte de medios + relación + content type).

pub mod container;
pub mod scaffold;
pub mod template;

pub use container::OpcContainer;
pub use scaffold::{minimal_template, write_minimal_template};
pub use template::{DocxTemplate, ImagenInline, TemplateContext, TemplateValue};
