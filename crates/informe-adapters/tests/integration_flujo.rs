//! Flujo de generación completo contra backends en memoria.

use std::sync::Arc;

use informe_adapters::{build_engine, GeneracionConfig, RegistroArtifact, Solicitud, StageDeps};
use informe_core::model::ArtifactSpec;
use informe_core::{PipelineEngine, PipelineEventKind};
use informe_domain::{current_year, Informe};
use informe_files::InMemoryFileStore;
use informe_registry::{InMemorySheetClient, Registry, RegistryConfig};
use informe_render::docx::write_minimal_template;

const IMG_OK: &str = "AAAAAAAAAAAAAAAAAAAA";
const IMG_MISSING: &str = "BBBBBBBBBBBBBBBBBBBB";

fn png_bytes() -> Vec<u8> {
    let mut bytes = Vec::new();
    let img = image::RgbImage::from_pixel(4, 4, image::Rgb([120, 10, 10]));
    image::DynamicImage::ImageRgb8(img).write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
                                       .expect("png de prueba");
    bytes
}

fn seeded_sheets() -> Arc<InMemorySheetClient> {
    Arc::new(
        InMemorySheetClient::new()
            .with_table("Proyectos",
                        vec![vec!["proyecto_id", "nombre_proyecto", "area"],
                             vec!["P-1", "Planta Norte", "10 ha"]])
            .with_table("Informes",
                        vec![vec!["id_informe", "proyecto_id", "fecha", "responsable", "cliente",
                                  "nivel_cumplimiento", "imagenes_drive_ids"],
                             vec!["REP-1", "P-1", "05/08/2026", "A. Soto", "ACME", "85%",
                                  "AAAAAAAAAAAAAAAAAAAA, BBBBBBBBBBBBBBBBBBBB"]]),
    )
}

struct Mundo {
    sheets: Arc<InMemorySheetClient>,
    deps: StageDeps,
    _workdir: tempfile::TempDir,
}

fn mundo() -> Mundo {
    let workdir = tempfile::tempdir().expect("tempdir");
    let config = GeneracionConfig::for_workdir(workdir.path());
    write_minimal_template(&config.template_path).expect("plantilla de arranque");

    let sheets = seeded_sheets();
    let registry = Registry::new(sheets.clone(), RegistryConfig::for_tests());
    let files = Arc::new(InMemoryFileStore::new().with_file(IMG_OK, png_bytes()));

    Mundo { sheets,
            deps: StageDeps::new(registry, files, config),
            _workdir: workdir }
}

fn resultado_final(engine: &PipelineEngine<informe_core::InMemoryEventStore,
                                           informe_core::InMemoryPipelineRepository>,
                   run_id: uuid::Uuid)
                   -> RegistroArtifact {
    let hash = engine.events_for(run_id)
                     .iter()
                     .rev()
                     .find_map(|e| match &e.kind {
                         PipelineEventKind::StageFinished { stage_id, outputs, .. }
                             if stage_id == "registrar_informe" => outputs.first().cloned(),
                         _ => None,
                     })
                     .expect("artifact final");
    RegistroArtifact::from_artifact(engine.get_artifact(&hash).expect("artifact almacenado")).expect("decodifica")
}

#[test]
fn generates_document_and_logs_registry_entry() {
    let m = mundo();
    let mut engine = build_engine(&m.deps, Solicitud::PorId { id_informe: "REP-1".into() });
    let run_id = engine.run().expect("la corrida completa");

    let fin = resultado_final(&engine, run_id);
    let numero_esperado = format!("INF-{}-00001", current_year());
    assert_eq!(fin.numero_informe, numero_esperado);
    assert!(fin.archivo_docx.starts_with(&numero_esperado));
    assert!(fin.archivo_docx.contains("Planta_Norte"));
    assert!(fin.registrado);
    assert_eq!(fin.imagenes_incrustadas, 1);
    assert_eq!(fin.imagenes_omitidas, 1);
    assert!(fin.archivo_pdf.is_none()); // PDF apagado en tests

    // documento en disco
    assert!(std::path::Path::new(&fin.ruta_docx).exists());
    assert!(!fin.sha256.is_empty());

    // bitácora con el número como id_informe
    let filas = m.sheets.raw_rows("Informes");
    let ultima = filas.last().expect("fila anexada");
    assert_eq!(ultima[1], numero_esperado);
    assert_eq!(ultima[0], "P-1");
    assert_eq!(ultima[3], "A. Soto");

    // la imagen fallida quedó como nota, no como error
    let notas = engine.notes_for(run_id);
    assert!(notas.iter().any(|(_, n)| n == "imagen_omitida"));
}

#[test]
fn direct_request_without_project_generates_with_empty_project() {
    let m = mundo();
    let informe = Informe { id_informe: "MANUAL-1".into(),
                            proyecto: "Obra Civil".into(),
                            cliente: "GAD".into(),
                            fecha: "05/08/2026".into(),
                            responsable: "".into(), // fuerza SIN_RESPONSABLE
                            nivel_cumplimiento: "150".into(), // se recorta a 100
                            ..Default::default() };
    let mut engine = build_engine(&m.deps, Solicitud::Directa { informe });
    let run_id = engine.run().expect("la corrida completa");

    let fin = resultado_final(&engine, run_id);
    assert!(fin.archivo_docx.contains("Obra_Civil"));

    // el turno quedó tomado con el responsable por defecto
    let reservas = m.sheets.raw_rows("INFORMES_SEQ");
    assert_eq!(reservas[1][1], "SIN_RESPONSABLE");
}

#[test]
fn registry_append_failure_still_reports_success() {
    let m = mundo();
    m.sheets.fail_appends_on("Informes");

    let mut engine = build_engine(&m.deps, Solicitud::PorId { id_informe: "REP-1".into() });
    let run_id = engine.run().expect("la corrida completa pese al registro fallido");

    let fin = resultado_final(&engine, run_id);
    assert!(!fin.registrado);
    assert!(std::path::Path::new(&fin.ruta_docx).exists());

    // la bitácora quedó como estaba: sin fila nueva
    let filas = m.sheets.raw_rows("Informes");
    assert_eq!(filas.len(), 2);
    let notas = engine.notes_for(run_id);
    assert!(notas.iter().any(|(stage, n)| stage == "registrar_informe" && n == "registro_no_anexado"));
}

#[test]
fn sequence_failure_aborts_before_any_document() {
    let m = mundo();
    m.sheets.fail_appends_on("INFORMES_SEQ");

    let mut engine = build_engine(&m.deps, Solicitud::PorId { id_informe: "REP-1".into() });
    engine.run().expect_err("la reserva fallida es terminal");

    // nada escrito en la carpeta de salida
    let salida = &m.deps.config.output_dir;
    let entradas = std::fs::read_dir(salida).map(|d| d.count()).unwrap_or(0);
    assert_eq!(entradas, 0);
}

#[test]
fn missing_template_fails_after_reservation_leaving_gap() {
    let m = mundo();
    std::fs::remove_file(&m.deps.config.template_path).expect("quitar plantilla");

    let mut engine = build_engine(&m.deps, Solicitud::PorId { id_informe: "REP-1".into() });
    engine.run().expect_err("sin plantilla el render es terminal");

    // el consecutivo quedó consumido: hueco aceptado en la numeración
    let reservas = m.sheets.raw_rows("INFORMES_SEQ");
    assert_eq!(reservas.len(), 2); // cabecera + turno tomado

    // no hay DOCX en la salida
    let hay_docx = std::fs::read_dir(&m.deps.config.output_dir)
        .map(|d| {
            d.filter_map(Result::ok)
             .any(|e| e.path().extension().map(|x| x == "docx").unwrap_or(false))
        })
        .unwrap_or(false);
    assert!(!hay_docx);

    let eventos = engine.events_for(engine.default_run_id().expect("run id"));
    assert!(eventos.iter().any(|e| matches!(&e.kind,
        PipelineEventKind::StageFailed { stage_id, .. } if stage_id == "renderizar_documento")));
}

#[test]
fn unknown_report_id_is_terminal_without_reservation() {
    let m = mundo();
    let mut engine = build_engine(&m.deps, Solicitud::PorId { id_informe: "NO-EXISTE".into() });
    engine.run().expect_err("id inexistente");

    // ni siquiera se tomó turno
    assert!(m.sheets.raw_rows("INFORMES_SEQ").is_empty());
}
