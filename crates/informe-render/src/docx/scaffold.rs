//! Plantilla mínima de arranque.
//!
//! Cuando no hay una plantilla corporativa configurada (modo demo, tests),
//! se fabrica un DOCX válido con los marcadores estándar del informe. No
//! sustituye a la plantilla real: es el esqueleto suficiente para ejercer
//! el flujo completo.

use std::path::Path;

use crate::error::RenderError;

use super::container::OpcContainer;

const CONTENT_TYPES: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
    r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
    r#"<Default Extension="xml" ContentType="application/xml"/>"#,
    r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
    r#"</Types>"#
);

const ROOT_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
    r#"</Relationships>"#
);

const DOCUMENT_RELS: &str = concat!(
    r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
    r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    r#"</Relationships>"#
);

/// Párrafo con un run de texto.
fn p(texto: &str) -> String {
    format!(r#"<w:p><w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#, texto)
}

/// Contenedor de plantilla con el cuerpo estándar del informe de
/// inspección.
pub fn minimal_template() -> OpcContainer {
    let cuerpo: String = [p("Informe {{numero_informe}}"),
                          p("Proyecto: {{nombre_proyecto}} ({{proyecto_id}})"),
                          p("Promotor: {{promotor_representante}}"),
                          p("Licencia: {{licencia_ambiental}} | Sector: {{sector_productivo}}"),
                          p("Ubicación: {{ubicacion_politica}} | Área: {{area}}"),
                          p("Fecha: {{fecha}} | Responsable: {{responsable}}"),
                          p("Sitio: {{sitio_inspeccion}}"),
                          p("Objetivo: {{objetivo_visita}}"),
                          p("Metodología: {{metodologia}}"),
                          p("Descripción: {{descripcion}}"),
                          p("Hallazgos: {{hallazgos}}"),
                          p("Conformidades: {{conformidades}}"),
                          p("No conformidades: {{no_conformidades}}"),
                          p("Acciones inmediatas: {{acciones_inmediatas}}"),
                          p("Conclusiones: {{conclusiones}}"),
                          p("Recomendaciones: {{recomendaciones}}"),
                          p("Nivel de cumplimiento: {{nivel_cumplimiento}} ({{porcentaje_cumplimiento}}%)"),
                          p("{{grafico_cumplimiento}}"),
                          p("Registro fotográfico:"),
                          p("{{imagenes}}")].concat();

    let document = format!(concat!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                                   r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
                                   r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing">"#,
                                   r#"<w:body>{}<w:sectPr/></w:body></w:document>"#),
                           cuerpo);

    let mut c = OpcContainer::new();
    c.set_part("[Content_Types].xml", CONTENT_TYPES.as_bytes().to_vec());
    c.set_part("_rels/.rels", ROOT_RELS.as_bytes().to_vec());
    c.set_part("word/document.xml", document.into_bytes());
    c.set_part("word/_rels/document.xml.rels", DOCUMENT_RELS.as_bytes().to_vec());
    c
}

/// Escribe la plantilla mínima en disco si la ruta no existe todavía.
pub fn write_minimal_template(path: &Path) -> Result<(), RenderError> {
    if path.exists() {
        return Ok(());
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    minimal_template().write_to(path)
}
