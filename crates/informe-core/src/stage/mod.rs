//! Definiciones relacionadas a etapas.
//!
//! Una etapa transforma a lo sumo un `Artifact` de entrada en 0..n artifacts
//! de salida. Este módulo define:
//! - `StageDefinition`: interfaz neutral usada por el motor.
//! - `TypedStage`: interfaz de alto nivel con tipos fuertes.
//! - `StageRunResult` y notas (`StageNote`) para degradación parcial.
//! - `Chain` para construir pipelines tipados que validan IO en compilación.

pub mod definition;
pub mod macros;
pub mod pipeline;
mod run_result;
mod status;
pub mod typed;

pub use definition::{StageDefinition, StageKind};
pub use pipeline::{Chain, SameAs};
pub use run_result::{StageNote, StageRunResult};
pub use status::StageStatus;
pub use typed::{StageRunResultTyped, TypedStage};
