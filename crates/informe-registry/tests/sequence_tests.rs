//! Propiedades de la reserva de secuencia contra un contador vacío.

use std::sync::Arc;

use informe_registry::{InMemorySheetClient, Registry, RegistryConfig, SEQUENCE_HEADERS};

fn registry_with(client: Arc<InMemorySheetClient>) -> Registry {
    Registry::new(client, RegistryConfig::for_tests())
}

#[test]
fn sequences_are_one_to_n_in_call_order() {
    let client = Arc::new(InMemorySheetClient::new());
    let registry = registry_with(client.clone());

    let n = 7;
    let mut seqs = Vec::new();
    for i in 0..n {
        let seq = registry.reserve_sequence("resp", &format!("P-{}", i)).expect("reserva");
        seqs.push(seq);
    }
    assert_eq!(seqs, (1..=n as u64).collect::<Vec<_>>());
}

#[test]
fn counter_tab_gets_headers_exactly_once() {
    let client = Arc::new(InMemorySheetClient::new());
    let registry = registry_with(client.clone());

    registry.reserve_sequence("resp", "P-1").expect("primera reserva");
    registry.reserve_sequence("resp", "P-2").expect("segunda reserva");

    let rows = client.raw_rows("INFORMES_SEQ");
    let esperado: Vec<String> = SEQUENCE_HEADERS.iter().map(|h| h.to_string()).collect();
    assert_eq!(rows[0], esperado);
    // cabecera + 2 reservas
    assert_eq!(rows.len(), 3);
    // ninguna fila posterior repite la cabecera
    assert!(rows.iter().skip(1).all(|r| r[0] != "timestamp"));
}

#[test]
fn reservation_rows_carry_responsible_and_project() {
    let client = Arc::new(InMemorySheetClient::new());
    let registry = registry_with(client.clone());

    registry.reserve_sequence("C. Guzmán", "P-77").expect("reserva");
    let rows = client.raw_rows("INFORMES_SEQ");
    let fila = &rows[1];
    assert_eq!(fila[1], "C. Guzmán");
    assert_eq!(fila[2], "P-77");
    assert!(!fila[0].is_empty(), "timestamp presente");
}

#[test]
fn counter_rows_are_never_rewritten() {
    // El log sólo crece: reservar otra vez no toca filas previas.
    let client = Arc::new(InMemorySheetClient::new());
    let registry = registry_with(client.clone());

    registry.reserve_sequence("a", "P-1").expect("reserva 1");
    let antes = client.raw_rows("INFORMES_SEQ");
    registry.reserve_sequence("b", "P-2").expect("reserva 2");
    let despues = client.raw_rows("INFORMES_SEQ");

    assert_eq!(&despues[..antes.len()], &antes[..]);
    assert_eq!(despues.len(), antes.len() + 1);
}
