//! Render de plantilla extremo a extremo a través del contenedor OPC.

use informe_render::docx::{minimal_template, DocxTemplate, OpcContainer};
use informe_render::{ImagenInline, RenderError, TemplateContext};

fn plantilla() -> DocxTemplate {
    DocxTemplate::from_container(minimal_template()).expect("plantilla mínima válida")
}

fn imagen_png_1x1() -> ImagenInline {
    // PNG opaco de 1x1 generado con el crate image.
    let mut bytes = Vec::new();
    let img = image::RgbImage::from_pixel(1, 1, image::Rgb([255, 0, 0]));
    image::DynamicImage::ImageRgb8(img).write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
                                       .expect("png de prueba");
    let im = image::load_from_memory(&bytes).expect("decodifica");
    ImagenInline { width_px: im.width(),
                   height_px: im.height(),
                   data: bytes,
                   encoding: informe_render::ImageEncoding::Png,
                   width_mm: None }
}

#[test]
fn substitutes_text_and_defaults_missing_keys_to_empty() {
    let mut tpl = plantilla();
    let mut ctx = TemplateContext::new();
    ctx.insert_text("numero_informe", "INF-2026-00042");
    ctx.insert_text("nombre_proyecto", "Planta & Norte");
    tpl.render(&ctx).expect("render");

    let doc = String::from_utf8(tpl.container().part("word/document.xml").unwrap().to_vec()).unwrap();
    assert!(doc.contains("INF-2026-00042"));
    assert!(doc.contains("Planta &amp; Norte"));
    // las claves sin valor desaparecen sin dejar marcador
    assert!(!doc.contains("{{"));
    assert!(doc.contains("Responsable: "));
}

#[test]
fn embeds_images_with_media_parts_and_relationships() {
    let mut tpl = plantilla();
    let mut ctx = TemplateContext::new();
    ctx.insert_image("grafico_cumplimiento", imagen_png_1x1());
    ctx.insert_image_list("imagenes", vec![imagen_png_1x1(), imagen_png_1x1()]);
    tpl.render(&ctx).expect("render");

    let doc = String::from_utf8(tpl.container().part("word/document.xml").unwrap().to_vec()).unwrap();
    assert_eq!(doc.matches("<w:drawing>").count(), 3);

    let nombres: Vec<&str> = tpl.container().part_names().collect();
    assert!(nombres.contains(&"word/media/image1.png"));
    assert!(nombres.contains(&"word/media/image3.png"));

    let rels = String::from_utf8(tpl.container().part("word/_rels/document.xml.rels").unwrap().to_vec()).unwrap();
    assert!(rels.contains(r#"Target="media/image1.png""#));

    let ct = String::from_utf8(tpl.container().part("[Content_Types].xml").unwrap().to_vec()).unwrap();
    assert!(ct.contains(r#"Extension="png""#));
}

#[test]
fn rendered_package_survives_a_disk_roundtrip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ruta = dir.path().join("salida.docx");

    let mut tpl = plantilla();
    let mut ctx = TemplateContext::new();
    ctx.insert_text("numero_informe", "INF-2026-00001");
    ctx.insert_image("grafico_cumplimiento", imagen_png_1x1());
    tpl.render(&ctx).expect("render");
    tpl.save(&ruta).expect("save");

    let reabierto = OpcContainer::read_from(&ruta).expect("paquete válido");
    let doc = String::from_utf8(reabierto.part("word/document.xml").unwrap().to_vec()).unwrap();
    assert!(doc.contains("INF-2026-00001"));
    assert!(reabierto.part("word/media/image1.png").is_some());
}

#[test]
fn unclosed_placeholder_is_a_fatal_template_error() {
    let mut c = minimal_template();
    let doc = String::from_utf8(c.part("word/document.xml").unwrap().to_vec()).unwrap();
    c.set_part("word/document.xml",
               doc.replace("{{numero_informe}}", "{{numero_informe").into_bytes());
    let mut tpl = DocxTemplate::from_container(c).expect("contenedor");

    let err = tpl.render(&TemplateContext::new()).expect_err("debe fallar");
    assert!(matches!(err, RenderError::Template(_)));
}

#[test]
fn template_without_document_part_is_rejected() {
    let mut c = OpcContainer::new();
    c.set_part("[Content_Types].xml", b"<Types/>".to_vec());
    assert!(matches!(DocxTemplate::from_container(c), Err(RenderError::Template(_))));
}
