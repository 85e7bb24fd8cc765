//! Sustitución de marcadores e imágenes inline sobre `word/document.xml`.
//!
//! El contrato del motor: `load` desde ruta, `render` con el contexto
//! completo, `save` a ruta. Claves ausentes del contexto se sustituyen por
//! cadena vacía (el constructor del contexto ya entrega defaults); un
//! marcador sin cerrar es error fatal de plantilla.

use std::path::Path;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::RenderError;
use crate::imagen::{ImageEncoding, ProcessedImage};

use super::container::OpcContainer;

const DOCUMENT_PART: &str = "word/document.xml";
const RELS_PART: &str = "word/_rels/document.xml.rels";
const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

const EMU_PER_MM: f64 = 36_000.0;
const EMU_PER_PX: f64 = 9_525.0; // 96 dpi

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{\{\s*([A-Za-z0-9_]+)\s*\}\}").expect("regex marcador"));

/// Imagen incrustable: bytes ya codificados, dimensiones y ancho físico
/// opcional (mm) que manda sobre el tamaño en píxeles.
#[derive(Debug, Clone)]
pub struct ImagenInline {
    pub data: Vec<u8>,
    pub encoding: ImageEncoding,
    pub width_px: u32,
    pub height_px: u32,
    pub width_mm: Option<f64>,
}

impl ImagenInline {
    /// Desde una imagen ya reprocesada.
    pub fn from_processed(img: ProcessedImage, width_mm: Option<f64>) -> Self {
        Self { data: img.data,
               encoding: img.encoding,
               width_px: img.width,
               height_px: img.height,
               width_mm }
    }

    /// Desde un archivo en disco (p. ej. el PNG del gráfico).
    pub fn from_path(path: &Path, width_mm: Option<f64>) -> Result<Self, RenderError> {
        let data = std::fs::read(path)?;
        let im = image::load_from_memory(&data).map_err(|e| RenderError::Image(e.to_string()))?;
        let encoding = match image::guess_format(&data) {
            Ok(image::ImageFormat::Jpeg) => ImageEncoding::Jpeg,
            _ => ImageEncoding::Png,
        };
        Ok(Self { width_px: im.width(),
                  height_px: im.height(),
                  data,
                  encoding,
                  width_mm })
    }

    /// Tamaño final en EMU (unidades del formato).
    fn extent_emu(&self) -> (u64, u64) {
        match self.width_mm {
            Some(mm) => {
                let cx = mm * EMU_PER_MM;
                let cy = cx * self.height_px as f64 / self.width_px.max(1) as f64;
                (cx as u64, cy as u64)
            }
            None => ((self.width_px as f64 * EMU_PER_PX) as u64, (self.height_px as f64 * EMU_PER_PX) as u64),
        }
    }
}

/// Valores admitidos por la plantilla.
#[derive(Debug, Clone)]
pub enum TemplateValue {
    Text(String),
    Image(ImagenInline),
    ImageList(Vec<ImagenInline>),
}

/// Contexto completo clave→valor que consume el render. El orden de
/// inserción se conserva (útil para inspección y logs).
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    values: IndexMap<String, TemplateValue>,
}

impl TemplateContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_text(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_string(), TemplateValue::Text(value.into()));
    }

    pub fn insert_image(&mut self, key: &str, img: ImagenInline) {
        self.values.insert(key.to_string(), TemplateValue::Image(img));
    }

    pub fn insert_image_list(&mut self, key: &str, imgs: Vec<ImagenInline>) {
        self.values.insert(key.to_string(), TemplateValue::ImageList(imgs));
    }

    pub fn get(&self, key: &str) -> Option<&TemplateValue> {
        self.values.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
}

/// Plantilla DOCX cargada en memoria.
pub struct DocxTemplate {
    container: OpcContainer,
}

impl DocxTemplate {
    pub fn load(path: &Path) -> Result<Self, RenderError> {
        let container = OpcContainer::read_from(path)?;
        if container.part(DOCUMENT_PART).is_none() {
            return Err(RenderError::Template(format!("la plantilla no contiene {}", DOCUMENT_PART)));
        }
        Ok(Self { container })
    }

    pub fn from_container(container: OpcContainer) -> Result<Self, RenderError> {
        if container.part(DOCUMENT_PART).is_none() {
            return Err(RenderError::Template(format!("la plantilla no contiene {}", DOCUMENT_PART)));
        }
        Ok(Self { container })
    }

    /// Sustituye todos los marcadores del documento con el contexto dado.
    pub fn render(&mut self, ctx: &TemplateContext) -> Result<(), RenderError> {
        let doc = self.container
                      .part(DOCUMENT_PART)
                      .ok_or_else(|| RenderError::Template(format!("falta {}", DOCUMENT_PART)))?;
        let doc = String::from_utf8(doc.to_vec())
            .map_err(|_| RenderError::Template("word/document.xml no es UTF-8".into()))?;

        let mut media = MediaRegistrar::scan(&self.container);

        let mut out = String::with_capacity(doc.len());
        let mut last = 0usize;
        let mut residual_braces = false;
        for caps in PLACEHOLDER.captures_iter(&doc) {
            let full = caps.get(0).ok_or_else(|| RenderError::Template("marcador sin captura".into()))?;
            let key = &caps[1];
            let segmento = &doc[last..full.start()];
            residual_braces |= segmento.contains("{{") || segmento.contains("}}");
            out.push_str(segmento);
            match ctx.get(key) {
                Some(TemplateValue::Text(t)) => out.push_str(&escape_text(t)),
                Some(TemplateValue::Image(img)) => out.push_str(&split_run(&[media.register(img)?])),
                Some(TemplateValue::ImageList(list)) => {
                    let mut dibujos = Vec::with_capacity(list.len());
                    for img in list {
                        dibujos.push(media.register(img)?);
                    }
                    out.push_str(&split_run(&dibujos));
                }
                // Clave ausente: cadena vacía, nunca error.
                None => {}
            }
            last = full.end();
        }
        let cola = &doc[last..];
        residual_braces |= cola.contains("{{") || cola.contains("}}");
        out.push_str(cola);

        // Un `{{` o `}}` fuera de todo marcador completo delata una
        // plantilla mal formada.
        if residual_braces {
            return Err(RenderError::Template("marcador sin cerrar en la plantilla".into()));
        }

        media.commit(&mut self.container);
        self.container.set_part(DOCUMENT_PART, out.into_bytes());
        Ok(())
    }

    pub fn save(&self, path: &Path) -> Result<(), RenderError> {
        self.container.write_to(path)
    }

    pub fn container(&self) -> &OpcContainer {
        &self.container
    }
}

/// Registra imágenes nuevas: partes de medios, relaciones y content types.
struct MediaRegistrar {
    next_media: usize,
    next_rel: usize,
    next_docpr: usize,
    new_parts: Vec<(String, Vec<u8>)>,
    new_rels: Vec<String>,
    extensions: Vec<&'static str>,
    drawings_emitted: bool,
}

impl MediaRegistrar {
    fn scan(container: &OpcContainer) -> Self {
        static MEDIA_N: Lazy<Regex> = Lazy::new(|| Regex::new(r"word/media/image(\d+)\.").expect("regex media"));
        static REL_N: Lazy<Regex> = Lazy::new(|| Regex::new(r#"Id="rId(\d+)""#).expect("regex rel"));

        let max_media = container.part_names()
                                 .filter_map(|n| MEDIA_N.captures(n))
                                 .filter_map(|c| c[1].parse::<usize>().ok())
                                 .max()
                                 .unwrap_or(0);
        let max_rel = container.part(RELS_PART)
                               .and_then(|b| String::from_utf8(b.to_vec()).ok())
                               .map(|xml| {
                                   REL_N.captures_iter(&xml)
                                        .filter_map(|c| c[1].parse::<usize>().ok())
                                        .max()
                                        .unwrap_or(0)
                               })
                               .unwrap_or(0);

        Self { next_media: max_media + 1,
               next_rel: max_rel + 1,
               next_docpr: 1000, // lejos de los ids que usan las plantillas
               new_parts: Vec::new(),
               new_rels: Vec::new(),
               extensions: Vec::new(),
               drawings_emitted: false }
    }

    /// Reserva parte + relación para una imagen y devuelve su XML de dibujo.
    fn register(&mut self, img: &ImagenInline) -> Result<String, RenderError> {
        if img.width_px == 0 || img.height_px == 0 {
            return Err(RenderError::Image("imagen con dimensión cero".into()));
        }
        let ext = img.encoding.extension();
        let media_name = format!("word/media/image{}.{}", self.next_media, ext);
        let rel_id = format!("rId{}", self.next_rel);
        let docpr = self.next_docpr;
        self.next_media += 1;
        self.next_rel += 1;
        self.next_docpr += 1;
        self.drawings_emitted = true;

        self.new_parts.push((media_name.clone(), img.data.clone()));
        self.new_rels.push(format!(
            r#"<Relationship Id="{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="{}"/>"#,
            rel_id,
            media_name.trim_start_matches("word/")
        ));
        if !self.extensions.contains(&ext) {
            self.extensions.push(ext);
        }

        let (cx, cy) = img.extent_emu();
        Ok(drawing_xml(&rel_id, docpr, cx, cy))
    }

    /// Vuelca partes nuevas, relaciones y content types al contenedor.
    fn commit(self, container: &mut OpcContainer) {
        if !self.drawings_emitted {
            return;
        }
        for (name, data) in self.new_parts {
            container.set_part(&name, data);
        }

        let rels_xml = container.part(RELS_PART)
                                .and_then(|b| String::from_utf8(b.to_vec()).ok())
                                .unwrap_or_else(|| {
                                    concat!(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                                            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"></Relationships>"#).to_string()
                                });
        let rels_xml = rels_xml.replace("</Relationships>",
                                        &format!("{}</Relationships>", self.new_rels.concat()));
        container.set_part(RELS_PART, rels_xml.into_bytes());

        if let Some(ct) = container.part(CONTENT_TYPES_PART)
                                   .and_then(|b| String::from_utf8(b.to_vec()).ok())
        {
            let mut ct = ct;
            for ext in &self.extensions {
                let marker = format!(r#"Extension="{}""#, ext);
                if !ct.contains(&marker) {
                    let default = format!(r#"<Default Extension="{}" ContentType="image/{}"/>"#, ext, ext);
                    ct = ct.replace("</Types>", &format!("{}</Types>", default));
                }
            }
            container.set_part(CONTENT_TYPES_PART, ct.into_bytes());
        }
    }
}

/// Cierra el run de texto actual, emite los dibujos y reabre un run.
/// Presupone el marcador dentro de `<w:r><w:t>…</w:t></w:r>`, que es como
/// queda un `{{ clave }}` escrito en el cuerpo del documento.
fn split_run(drawings: &[String]) -> String {
    let mut out = String::from("</w:t></w:r>");
    for d in drawings {
        out.push_str("<w:r>");
        out.push_str(d);
        out.push_str("</w:r>");
    }
    out.push_str(r#"<w:r><w:t xml:space="preserve">"#);
    out
}

fn drawing_xml(rel_id: &str, docpr: usize, cx: u64, cy: u64) -> String {
    format!(
        concat!(
            r#"<w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0">"#,
            r#"<wp:extent cx="{cx}" cy="{cy}"/>"#,
            r#"<wp:docPr id="{id}" name="Imagen {id}"/>"#,
            r#"<a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">"#,
            r#"<a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
            r#"<pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">"#,
            r#"<pic:nvPicPr><pic:cNvPr id="{id}" name="Imagen {id}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
            r#"<pic:blipFill><a:blip r:embed="{rel}" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"/>"#,
            r#"<a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
            r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr>"#,
            r#"</pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing>"#
        ),
        cx = cx,
        cy = cy,
        id = docpr,
        rel = rel_id
    )
}

/// Escapa texto para XML; los saltos de línea se convierten en `<w:br/>`.
fn escape_text(text: &str) -> String {
    let escaped = text.replace('&', "&amp;")
                      .replace('<', "&lt;")
                      .replace('>', "&gt;")
                      .replace('"', "&quot;")
                      .replace('\'', "&apos;");
    escaped.replace("\r\n", "\n")
           .replace('\n', r#"</w:t><w:br/><w:t xml:space="preserve">"#)
}
