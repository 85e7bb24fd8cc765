//! Motor de ejecución del pipeline.
//!
//! Provee el motor, el builder con chequeo de tipos y el contexto de
//! corrida para ejecución paso a paso.

pub mod builder;
pub mod core;
pub mod ctx;

pub use builder::{EngineBuilder, EngineBuilderInit};
pub use core::PipelineEngine;
pub use ctx::PipelineCtx;

pub use crate::event::{EventStore, InMemoryEventStore, PipelineEvent, PipelineEventKind};
pub use crate::repo::{InMemoryPipelineRepository, PipelineDefinition, PipelineRepository};
pub use crate::stage::{StageRunResult, StageStatus};
