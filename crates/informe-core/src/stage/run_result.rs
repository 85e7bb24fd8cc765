use serde_json::Value;

use crate::{errors::EngineError, model::Artifact};

/// Nota ligera emitida junto a un resultado exitoso: deja rastro de una
/// degradación no fatal (imagen omitida, PDF no generado, registro
/// posterior fallido) sin interrumpir la corrida.
#[derive(Debug, Clone)]
pub struct StageNote {
    pub note: String,
    pub data: Value,
}

/// Resultado abstracto de ejecutar una etapa.
pub enum StageRunResult {
    Success { outputs: Vec<Artifact> },
    SuccessWithNotes { outputs: Vec<Artifact>, notes: Vec<StageNote> },
    Failure { error: EngineError },
}
