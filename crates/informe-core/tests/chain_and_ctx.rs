//! Encadenador tipado (`Chain`) y ejecución paso a paso con `PipelineCtx`.

use informe_core::stage::Chain;
use informe_core::{typed_artifact, typed_stage, PipelineCtx, PipelineEngine, StageKind};
use uuid::Uuid;

typed_artifact!(Conteo { n: u32 });

typed_stage! {
    source Semilla {
        id: "semilla",
        output: Conteo,
        params: (),
        run(_me, _p) {{
            Conteo { n: 0, schema_version: 1 }
        }}
    }
}

typed_stage! {
    stage Incremento {
        id: "incremento",
        kind: StageKind::Transform,
        input: Conteo,
        output: Conteo,
        params: (),
        run(_me, inp, _p) {{
            Conteo { n: inp.n + 1, schema_version: 1 }
        }}
    }
}

typed_stage! {
    stage Cierre {
        id: "cierre",
        kind: StageKind::Sink,
        input: Conteo,
        output: Conteo,
        params: (),
        run(_me, inp, _p) {{ inp }}
    }
}

#[test]
fn chain_builds_a_definition_with_stable_hash() {
    let def_a = Chain::new(Semilla::new()).then(Incremento::new()).then(Cierre::new()).build();
    let def_b = Chain::new(Semilla::new()).then(Incremento::new()).then(Cierre::new()).build();
    assert_eq!(def_a.len(), 3);
    // misma secuencia de ids → misma definition_hash
    assert_eq!(def_a.definition_hash, def_b.definition_hash);
}

#[test]
fn ctx_runs_a_chained_definition_step_by_step() {
    let definition = Chain::new(Semilla::new()).then(Incremento::new()).then(Cierre::new()).build();
    let mut engine = PipelineEngine::default();
    let run_id = Uuid::new_v4();

    let mut ctx = PipelineCtx::new(&mut engine, run_id, &definition);
    ctx.step().expect("semilla");
    ctx.run_n(2).expect("incremento + cierre");
    // la corrida ya completó: run_n normaliza RunCompleted a Ok
    ctx.run_n(1).expect("sin etapas pendientes");

    let eventos = engine.events_for(run_id);
    assert!(eventos.iter()
                   .any(|e| matches!(e.kind, informe_core::PipelineEventKind::RunCompleted { .. })));
}
