//! Flujo extremo a extremo a nivel de servicio (`GeneradorInformes`).

use std::sync::Arc;

use informe_adapters::{GeneracionConfig, Solicitud};
use informe_domain::current_year;
use informe_files::InMemoryFileStore;
use informe_registry::{InMemorySheetClient, Registry, RegistryConfig};
use informe_render::docx::write_minimal_template;
use informe_render::{render_compliance_chart, ChartOptions};
use informes_rust::{GeneracionError, GeneradorInformes};

const IMG_OK: &str = "AAAAAAAAAAAAAAAAAAAA";

struct Mundo {
    sheets: Arc<InMemorySheetClient>,
    generador: GeneradorInformes,
    _workdir: tempfile::TempDir,
}

fn png_de_prueba(workdir: &std::path::Path) -> Vec<u8> {
    let ruta = render_compliance_chart(10.0, "img_prueba", workdir, &ChartOptions::default()).expect("png");
    std::fs::read(ruta).expect("bytes del png")
}

fn mundo() -> Mundo {
    let workdir = tempfile::tempdir().expect("tempdir");
    let config = GeneracionConfig::for_workdir(workdir.path());
    write_minimal_template(&config.template_path).expect("plantilla");

    let sheets = Arc::new(
        InMemorySheetClient::new()
            .with_table("Proyectos",
                        vec![vec!["proyecto_id", "nombre_proyecto", "area"],
                             vec!["P-1", "Planta Norte", "10 ha"]])
            .with_table("Informes",
                        vec![vec!["id_informe", "proyecto_id", "fecha", "responsable", "cliente",
                                  "nivel_cumplimiento", "imagenes_drive_ids"],
                             vec!["REP-1", "P-1", "05/08/2026", "A. Soto", "ACME", "85%",
                                  "AAAAAAAAAAAAAAAAAAAA, BBBBBBBBBBBBBBBBBBBB"]]),
    );
    let files = Arc::new(InMemoryFileStore::new().with_file(IMG_OK, png_de_prueba(workdir.path())));
    let registry = Registry::new(sheets.clone(), RegistryConfig::for_tests());

    Mundo { sheets,
            generador: GeneradorInformes::new(registry, files, config),
            _workdir: workdir }
}

#[test]
fn well_formed_request_produces_numbered_file_and_registry_row() {
    let m = mundo();
    let r = m.generador.generar(Solicitud::PorId { id_informe: "REP-1".into() }).expect("generación");

    let numero = format!("INF-{}-00001", current_year());
    assert_eq!(r.numero_informe, numero);
    assert_eq!(r.secuencia, 1);
    assert!(r.archivo_docx.starts_with(&numero), "el nombre embebe el número de informe");
    assert!(std::path::Path::new(&r.ruta_docx).exists());
    assert!(r.registrado);

    // la bitácora recibió la fila con el mismo número
    let filas = m.sheets.raw_rows("Informes");
    assert_eq!(filas.last().expect("fila")[1], numero);

    // la imagen inaccesible degradó a advertencia
    assert_eq!(r.imagenes_incrustadas, 1);
    assert_eq!(r.imagenes_omitidas, 1);
    assert!(r.advertencias.iter().any(|a| a.contains("imagen_omitida")));
}

#[test]
fn consecutive_generations_advance_the_sequence() {
    let m = mundo();
    let r1 = m.generador.generar(Solicitud::PorId { id_informe: "REP-1".into() }).expect("gen 1");
    let r2 = m.generador.generar(Solicitud::PorId { id_informe: "REP-1".into() }).expect("gen 2");
    assert_eq!(r1.secuencia, 1);
    assert_eq!(r2.secuencia, 2);
    assert!(r2.numero_informe.ends_with("00002"));
}

#[test]
fn failed_registry_append_is_success_with_warning() {
    let m = mundo();
    m.sheets.fail_appends_on("Informes");

    let r = m.generador.generar(Solicitud::PorId { id_informe: "REP-1".into() }).expect("éxito pese a bitácora");
    assert!(!r.registrado);
    assert!(std::path::Path::new(&r.ruta_docx).exists());
    assert!(r.advertencias.iter().any(|a| a.contains("registro_no_anexado")));

    // el archivo existe pero la bitácora no cambió: inconsistencia aceptada
    assert_eq!(m.sheets.raw_rows("Informes").len(), 2);
}

#[test]
fn unknown_id_maps_to_not_found() {
    let m = mundo();
    let err = m.generador.generar(Solicitud::PorId { id_informe: "NADA".into() }).expect_err("no existe");
    assert!(matches!(err, GeneracionError::NoEncontrado(_)));
}

#[test]
fn sequence_failure_maps_to_secuencia() {
    let m = mundo();
    m.sheets.fail_appends_on("INFORMES_SEQ");
    let err = m.generador.generar(Solicitud::PorId { id_informe: "REP-1".into() }).expect_err("reserva falla");
    assert!(matches!(err, GeneracionError::Secuencia(_)));
}

#[test]
fn missing_template_maps_to_configuracion() {
    let m = mundo();
    std::fs::remove_file(m._workdir.path().join("plantilla.docx")).expect("quitar plantilla");
    let err = m.generador.generar(Solicitud::PorId { id_informe: "REP-1".into() }).expect_err("sin plantilla");
    assert!(matches!(err, GeneracionError::Configuracion(_)));
}

#[test]
fn preview_merges_project_over_report_precedence() {
    let m = mundo();
    let vista = m.generador.previsualizar("REP-1").expect("existe");
    assert_eq!(vista.area, "10 ha"); // del proyecto
    assert_eq!(vista.responsable, "A. Soto"); // del informe
    assert_eq!(vista.nombre_base(), "Planta Norte");

    let err = m.generador.previsualizar("NADA").expect_err("no existe");
    assert!(matches!(err, GeneracionError::NoEncontrado(_)));
}

#[test]
fn lists_projects_for_selector() {
    let m = mundo();
    let proyectos = m.generador.proyectos().expect("lectura");
    assert_eq!(proyectos.len(), 1);
    assert_eq!(proyectos[0].get("proyecto_id").unwrap(), "P-1");
}
