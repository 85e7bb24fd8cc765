//! Tipos de evento de una corrida y estructura `PipelineEvent`.
//!
//! Cada corrida del motor emite eventos a un `EventStore` append-only; el
//! estado del repositorio se reconstruye por replay de esos eventos, sin
//! estructuras mutables aparte. `PipelineEventKind` es el contrato
//! observable y estable del motor: las transiciones del flujo de generación
//! (proyecto resuelto, secuencia reservada, imágenes resueltas, contexto,
//! render, PDF, registro) se observan como `StageFinished` de cada etapa.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::EngineError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PipelineEventKind {
    /// Primer evento de toda corrida: fija la `definition_hash` y el número
    /// de etapas.
    RunInitialized { definition_hash: String, stage_count: usize },
    /// Una etapa comenzó su ejecución. No implica éxito.
    StageStarted { stage_index: usize, stage_id: String },
    /// Una etapa terminó correctamente, con sus outputs (hashes) y
    /// fingerprint.
    StageFinished {
        stage_index: usize,
        stage_id: String,
        outputs: Vec<String>,
        fingerprint: String,
    },
    /// Una etapa terminó con error terminal. La corrida no continúa
    /// (stop-on-failure).
    StageFailed {
        stage_index: usize,
        stage_id: String,
        error: EngineError,
        fingerprint: String,
    },
    /// Nota ligera emitida por una etapa: degradaciones no fatales como una
    /// imagen omitida, una conversión PDF fallida o un registro posterior
    /// que no pudo anexarse. No altera el estado principal.
    StageNote {
        stage_index: usize,
        stage_id: String,
        note: String,
        data: serde_json::Value,
    },
    /// Cierre de la corrida con fingerprint agregado (hash de los
    /// fingerprints de etapas exitosas, en orden).
    RunCompleted { run_fingerprint: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineEvent {
    pub seq: u64, // asignado por el EventStore (orden de append)
    pub run_id: Uuid,
    pub kind: PipelineEventKind,
    pub ts: DateTime<Utc>, // metadato (no entra en fingerprints)
}
