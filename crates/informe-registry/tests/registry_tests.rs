use std::sync::Arc;

use informe_registry::{InMemorySheetClient, Registry, RegistryConfig, REPORT_LOG_HEADERS};

fn seeded_client() -> Arc<InMemorySheetClient> {
    Arc::new(
        InMemorySheetClient::new()
            .with_table("Proyectos",
                        vec![vec!["proyecto_id", "nombre_proyecto", "area"],
                             vec!["P-1", "Planta Norte", "10 ha"],
                             vec!["P-2", "Camal Municipal", "2 ha"]])
            .with_table("Informes",
                        vec![vec!["id_informe", "proyecto_id", "responsable"],
                             vec!["REP-1", "P-1", "A. Soto"]])
            .with_table("Datos",
                        vec![vec!["id_informe", "proyecto", "cliente"],
                             vec!["VIEJO-9", "Proyecto Legado", "Cliente Legado"]]),
    )
}

fn registry() -> (Arc<InMemorySheetClient>, Registry) {
    let client = seeded_client();
    (client.clone(), Registry::new(client, RegistryConfig::for_tests()))
}

#[test]
fn lists_all_projects() {
    let (_c, reg) = registry();
    let proyectos = reg.list_projects().expect("lectura");
    assert_eq!(proyectos.len(), 2);
    assert_eq!(proyectos[1].get("nombre_proyecto").unwrap(), "Camal Municipal");
}

#[test]
fn project_lookup_trims_and_misses_cleanly() {
    let (_c, reg) = registry();
    assert!(reg.get_project_by_id(" P-1 ").expect("lectura").is_some());
    assert!(reg.get_project_by_id("P-99").expect("lectura").is_none());
    assert!(reg.get_project_by_id("").expect("lectura").is_none());
}

#[test]
fn report_lookup_prefers_new_tab_and_falls_back_to_legacy() {
    let (_c, reg) = registry();
    let nuevo = reg.get_report_by_id("REP-1").expect("lectura").expect("existe");
    assert_eq!(nuevo.get("responsable").unwrap(), "A. Soto");

    let legado = reg.get_report_by_id("VIEJO-9").expect("lectura").expect("existe en hoja legada");
    assert_eq!(legado.get("cliente").unwrap(), "Cliente Legado");

    assert!(reg.get_report_by_id("NO-EXISTE").expect("lectura").is_none());
}

#[test]
fn append_report_entry_creates_headers_and_row() {
    let client = Arc::new(InMemorySheetClient::new());
    let reg = Registry::new(client.clone(), RegistryConfig::for_tests());

    reg.append_report_entry("P-1", "INF-2026-00001", "2026-08-05 10:00:00", "A. Soto")
       .expect("append");

    let rows = client.raw_rows("Informes");
    let esperado: Vec<String> = REPORT_LOG_HEADERS.iter().map(|h| h.to_string()).collect();
    assert_eq!(rows[0], esperado);
    assert_eq!(rows[1], vec!["P-1", "INF-2026-00001", "2026-08-05 10:00:00", "A. Soto"]);
}

#[test]
fn add_project_respects_existing_column_order() {
    let (client, reg) = registry();
    let mut nuevo = informe_domain::Registro::new();
    nuevo.insert("area".into(), "5 ha".into());
    nuevo.insert("proyecto_id".into(), "P-3".into());
    nuevo.insert("nombre_proyecto".into(), "Ladrillera".into());

    let id = reg.add_project(&nuevo).expect("append");
    assert_eq!(id, "P-3");

    let rows = client.raw_rows("Proyectos");
    // la hoja declara proyecto_id | nombre_proyecto | area
    assert_eq!(rows.last().unwrap(), &vec!["P-3".to_string(), "Ladrillera".to_string(), "5 ha".to_string()]);
}
