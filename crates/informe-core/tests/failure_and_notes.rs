//! Comportamiento stop-on-failure y notas de degradación parcial.

use informe_core::errors::EngineError;
use informe_core::stage::{StageNote, StageRunResultTyped, TypedStage};
use informe_core::{typed_artifact, typed_stage, PipelineEngine, PipelineEventKind, StageKind};
use serde_json::json;

typed_artifact!(Paso { n: u32 });

typed_stage! {
    source Inicio {
        id: "inicio",
        output: Paso,
        params: (),
        run(_me, _p) {{
            Paso { n: 1, schema_version: 1 }
        }}
    }
}

#[derive(Debug, Clone)]
struct EtapaQueFalla;

impl TypedStage for EtapaQueFalla {
    type Params = ();
    type Input = Paso;
    type Output = Paso;

    fn id(&self) -> &'static str {
        "falla"
    }

    fn kind(&self) -> StageKind {
        StageKind::Transform
    }

    fn run_typed(&self, _input: Option<Paso>, _params: ()) -> StageRunResultTyped<Paso> {
        StageRunResultTyped::Failure { error: EngineError::Internal("colapso controlado".into()) }
    }
}

#[derive(Debug, Clone)]
struct EtapaConNota;

impl TypedStage for EtapaConNota {
    type Params = ();
    type Input = Paso;
    type Output = Paso;

    fn id(&self) -> &'static str {
        "con_nota"
    }

    fn kind(&self) -> StageKind {
        StageKind::Sink
    }

    fn run_typed(&self, input: Option<Paso>, _params: ()) -> StageRunResultTyped<Paso> {
        let inp = input.expect("input requerido");
        StageRunResultTyped::SuccessWithNotes { outputs: vec![inp],
                                                notes: vec![StageNote { note: "elemento_omitido".into(),
                                                                        data: json!({"motivo": "prueba"}) }] }
    }
}

#[test]
fn terminal_failure_stops_the_run_and_records_event() {
    let mut engine = PipelineEngine::new().first_stage(Inicio::new())
                                          .add_stage(EtapaQueFalla)
                                          .add_stage(EtapaConNota)
                                          .build();

    let err = engine.run().expect_err("la corrida debe fallar");
    assert_eq!(err, EngineError::Internal("colapso controlado".into()));

    let events = engine.events().expect("eventos");
    assert!(events.iter().any(|e| matches!(&e.kind,
        PipelineEventKind::StageFailed { stage_id, .. } if stage_id == "falla")));
    // La etapa posterior nunca arrancó
    assert!(!events.iter().any(|e| matches!(&e.kind,
        PipelineEventKind::StageStarted { stage_id, .. } if stage_id == "con_nota")));

    // Reintentar sobre una corrida fallida es rechazado (stop-on-failure)
    assert_eq!(engine.step(), Err(EngineError::RunHasFailed));
}

#[test]
fn notes_surface_in_event_log_without_failing() {
    let mut engine = PipelineEngine::new().first_stage(Inicio::new())
                                          .add_stage(EtapaConNota)
                                          .build();
    let run_id = engine.run().expect("la corrida completa");

    let notas = engine.notes_for(run_id);
    assert_eq!(notas, vec![("con_nota".to_string(), "elemento_omitido".to_string())]);

    let variants = engine.event_variants().expect("variantes");
    assert!(variants.contains(&"N"));
    assert!(variants.contains(&"C"));
}
