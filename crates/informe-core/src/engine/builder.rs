//! Builder para `PipelineEngine`.
//!
//! Patrón builder con chequeo en compilación: obliga a declarar la primera
//! etapa (fuente) y a encadenar etapas cuyos tipos de entrada y salida sean
//! compatibles.
//!
//! - `EngineBuilderInit` es el estado inicial: stores (event_store +
//!   repository) presentes, sin etapas todavía.
//! - `EngineBuilder<S, E, R>` conserva el último tipo de salida conocido
//!   `S::Output` (mediante `PhantomData`) y la lista de etapas como
//!   `Vec<Box<dyn StageDefinition>>`.
//! - `add_stage` exige en sus bounds que la entrada de la etapa siguiente
//!   coincida con la salida de la anterior usando `SameAs`.

use std::fmt::Debug;
use std::marker::PhantomData;

use crate::engine::PipelineEngine;
use crate::event::EventStore;
use crate::repo::PipelineRepository;
use crate::stage::{SameAs, StageDefinition, TypedStage};

/// Estado inicial del builder.
pub struct EngineBuilderInit<E: EventStore, R: PipelineRepository> {
    /// Store de eventos que usará el motor.
    pub event_store: E,
    /// Repositorio de replay de la corrida.
    pub repository: R,
}

impl<E: EventStore, R: PipelineRepository> EngineBuilderInit<E, R> {
    /// Define la primera etapa del pipeline y transiciona al builder
    /// completo. La primera etapa debe ser `Source`; la aserción aplica en
    /// builds de desarrollo.
    #[inline]
    pub fn first_stage<S>(self, stage: S) -> EngineBuilder<S, E, R>
        where S: TypedStage + Debug + 'static
    {
        debug_assert!(matches!(stage.kind(), crate::stage::StageKind::Source),
                      "la primera etapa debe ser de tipo Source");

        EngineBuilder { event_store: self.event_store,
                        repository: self.repository,
                        stages: vec![Box::new(stage)],
                        _out: PhantomData::<S::Output> }
    }
}

/// Builder principal que acumula etapas y garantiza compatibilidad de tipos.
pub struct EngineBuilder<S: TypedStage + Debug + 'static, E: EventStore, R: PipelineRepository> {
    event_store: E,
    repository: R,
    stages: Vec<Box<dyn StageDefinition>>,
    /// Marcador de tipo para el output de la última etapa añadida.
    _out: PhantomData<S::Output>,
}

impl<S: TypedStage + Debug + 'static, E: EventStore, R: PipelineRepository> EngineBuilder<S, E, R> {
    /// Añade la siguiente etapa. `N::Input: SameAs<S::Output>` asegura la
    /// compatibilidad con la salida de la etapa anterior.
    #[inline]
    pub fn add_stage<N>(mut self, next: N) -> EngineBuilder<N, E, R>
        where N: TypedStage + Debug + 'static,
              N::Input: SameAs<S::Output>
    {
        self.stages.push(Box::new(next));

        EngineBuilder { event_store: self.event_store,
                        repository: self.repository,
                        stages: self.stages,
                        _out: PhantomData }
    }

    /// Construye el `PipelineEngine` final: genera la definición a partir de
    /// las etapas acumuladas y la fija como definición por defecto.
    #[inline]
    pub fn build(self) -> PipelineEngine<E, R> {
        let mut engine = PipelineEngine::new_with_stores(self.event_store, self.repository);
        let definition = crate::repo::build_pipeline_definition_auto(self.stages);
        engine.set_default_definition(definition);
        engine
    }
}
