//! informe-core: motor lineal de generación basado en eventos.
//!
//! El motor no conoce el dominio de informes: ejecuta una secuencia de
//! etapas (Source → Transform… → Sink) sobre artifacts JSON neutrales,
//! registrando cada transición en un log de eventos append-only. El estado
//! de una corrida se reconstruye siempre por replay de ese log; las etapas
//! expresan degradación parcial (imágenes omitidas, PDF fallido, registro
//! posterior fallido) mediante notas, y cualquier fallo terminal detiene la
//! corrida (stop-on-failure).

pub mod constants;
pub mod engine;
pub mod errors;
pub mod event;
pub mod hashing;
pub mod model;
pub mod repo;
pub mod stage;

pub use engine::{PipelineCtx, PipelineEngine};
pub use event::{EventStore, InMemoryEventStore, PipelineEvent, PipelineEventKind};
pub use model::{Artifact, ArtifactKind, StageContext};
pub use repo::{build_pipeline_definition, build_pipeline_definition_auto, InMemoryPipelineRepository,
               PipelineDefinition, PipelineRepository};
pub use stage::{SameAs, StageDefinition, StageKind, StageNote, StageRunResult, StageRunResultTyped, StageStatus,
                TypedStage};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::StageKind;

    typed_artifact!(Texto { value: String });

    typed_stage! {
        source Origen {
            id: "origen",
            output: Texto,
            params: (),
            run(_me, _p) {{
                Texto { value: "hola".into(), schema_version: 1 }
            }}
        }
    }

    typed_stage! {
        stage Mayusculas {
            id: "mayusculas",
            kind: StageKind::Transform,
            input: Texto,
            output: Texto,
            params: (),
            run(_me, inp, _p) {{
                Texto { value: inp.value.to_uppercase(), schema_version: 1 }
            }}
        }
    }

    typed_stage! {
        stage Cierre {
            id: "cierre",
            kind: StageKind::Sink,
            input: Texto,
            output: Texto,
            params: (),
            run(_me, inp, _p) {{ inp }}
        }
    }

    #[test]
    fn builder_runs_linear_pipeline_to_completion() {
        let mut engine = PipelineEngine::new().first_stage(Origen::new())
                                              .add_stage(Mayusculas::new())
                                              .add_stage(Cierre::new())
                                              .build();
        let run_id = engine.run().expect("pipeline should complete");
        let events = engine.events_for(run_id);
        assert!(events.iter()
                      .any(|e| matches!(e.kind, PipelineEventKind::RunCompleted { .. })));
        // origen + mayusculas + cierre = 3 StageFinished
        let finished = events.iter()
                             .filter(|e| matches!(e.kind, PipelineEventKind::StageFinished { .. }))
                             .count();
        assert_eq!(finished, 3);
    }

    #[test]
    fn completed_run_rejects_further_steps() {
        let mut engine = PipelineEngine::new().first_stage(Origen::new())
                                              .add_stage(Cierre::new())
                                              .build();
        engine.run().expect("run");
        assert!(matches!(engine.step(), Err(errors::EngineError::RunCompleted)));
    }

    #[test]
    fn run_fingerprint_present_after_completion() {
        let mut engine = PipelineEngine::new().first_stage(Origen::new())
                                              .add_stage(Mayusculas::new())
                                              .add_stage(Cierre::new())
                                              .build();
        engine.run().expect("run");
        assert!(engine.run_fingerprint().is_some());
    }
}
