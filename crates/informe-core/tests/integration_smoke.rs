use informe_core::repo::build_pipeline_definition;
use informe_core::{EventStore, InMemoryEventStore, PipelineEngine, PipelineEventKind};
use uuid::Uuid;

#[test]
fn integration_smoke_inmemory_store_and_engine() {
    // El store in-memory debe permitir append y list de forma determinista
    let mut store = InMemoryEventStore::default();
    let _def = build_pipeline_definition(&["s1"], vec![]);
    let run_id = Uuid::new_v4();

    let ev = store.append_kind(run_id,
                               PipelineEventKind::RunInitialized { definition_hash: "h1".to_string(),
                                                                   stage_count: 1 });
    assert_eq!(ev.seq, 0);

    let repo = informe_core::repo::InMemoryPipelineRepository::new();
    let engine: PipelineEngine<_, _> = PipelineEngine::new_with_stores(store, repo);

    let events = engine.event_store().list(run_id);
    assert!(events.iter().any(|e| matches!(e.kind, PipelineEventKind::RunInitialized { .. })),
            "RunInitialized missing");
}
