//! Errores terminales del motor.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub enum EngineError {
    #[error("run already completed")] RunCompleted,
    #[error("run has failed previously (stop-on-failure invariant)")] RunHasFailed,
    #[error("invalid stage index")] InvalidStageIndex,
    #[error("missing required input")] MissingInput,
    #[error("first stage must be source kind")] FirstStageMustBeSource,
    #[error("internal: {0}")] Internal(String),
}
