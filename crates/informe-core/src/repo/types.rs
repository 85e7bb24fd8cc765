//! Tipos de repositorio: estado reconstruido (`PipelineInstance`) y
//! definición (`PipelineDefinition`).
//!
//! El repositorio aplica un replay lineal: consume eventos en orden y
//! actualiza un `PipelineInstance`. No almacena artifacts completos (sólo
//! hashes) para mantener neutralidad.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::event::{PipelineEvent, PipelineEventKind};
use crate::stage::{StageDefinition, StageStatus};

pub struct PipelineInstance {
    pub id: Uuid,
    pub stages: Vec<StageSlot>,
    pub cursor: usize,
    pub completed: bool,
    pub failed: bool,
}

/// Estado de una etapa dentro de la instancia.
pub struct StageSlot {
    pub stage_id: String,
    pub status: StageStatus,
    pub fingerprint: Option<String>,
    pub outputs: Vec<String>, // sólo hashes; los artifacts viven en el motor
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

/// Trait para reconstruir (`replay`) el estado de una corrida a partir de
/// eventos.
pub trait PipelineRepository {
    fn load(&self, run_id: Uuid, events: &[PipelineEvent], definition: &PipelineDefinition) -> PipelineInstance;
}

/// Definición inmutable del pipeline.
pub struct PipelineDefinition {
    pub stages: Vec<Box<dyn StageDefinition>>,
    pub definition_hash: String,
}

impl PipelineDefinition {
    pub fn new(stages: Vec<Box<dyn StageDefinition>>, definition_hash: String) -> Self {
        Self { stages, definition_hash }
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

pub struct InMemoryPipelineRepository;

impl InMemoryPipelineRepository {
    pub fn new() -> Self {
        Self
    }
}

impl Default for InMemoryPipelineRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl PipelineRepository for InMemoryPipelineRepository {
    fn load(&self, run_id: Uuid, events: &[PipelineEvent], definition: &PipelineDefinition) -> PipelineInstance {
        let mut stages: Vec<StageSlot> = definition.stages
                                                   .iter()
                                                   .map(|s| StageSlot { stage_id: s.id().to_string(),
                                                                        status: StageStatus::Pending,
                                                                        fingerprint: None,
                                                                        outputs: vec![],
                                                                        started_at: None,
                                                                        finished_at: None })
                                                   .collect();
        let mut completed = false;
        let mut failed = false;
        for ev in events {
            match &ev.kind {
                PipelineEventKind::RunInitialized { .. } => {}
                PipelineEventKind::StageStarted { stage_index, .. } => {
                    if let Some(slot) = stages.get_mut(*stage_index) {
                        slot.status = StageStatus::Running;
                        slot.started_at = Some(ev.ts);
                    }
                }
                PipelineEventKind::StageFinished { stage_index,
                                                   fingerprint,
                                                   outputs,
                                                   .. } => {
                    if let Some(slot) = stages.get_mut(*stage_index) {
                        slot.status = StageStatus::FinishedOk;
                        slot.fingerprint = Some(fingerprint.clone());
                        slot.outputs = outputs.clone();
                        slot.finished_at = Some(ev.ts);
                    }
                }
                PipelineEventKind::StageFailed { stage_index, fingerprint, .. } => {
                    if let Some(slot) = stages.get_mut(*stage_index) {
                        slot.status = StageStatus::Failed;
                        slot.fingerprint = Some(fingerprint.clone());
                        slot.finished_at = Some(ev.ts);
                    }
                    failed = true;
                }
                PipelineEventKind::RunCompleted { .. } => completed = true,
                PipelineEventKind::StageNote { .. } => {}
            }
        }
        let cursor = stages.iter()
                           .position(|s| matches!(s.status, StageStatus::Pending))
                           .unwrap_or(stages.len());
        PipelineInstance { id: run_id,
                           stages,
                           cursor,
                           completed,
                           failed }
    }
}

pub fn build_pipeline_definition(stage_ids: &[&str], stages: Vec<Box<dyn StageDefinition>>) -> PipelineDefinition {
    use crate::hashing::{hash_str, to_canonical_json};
    use serde_json::json;
    let ids_json = json!(stage_ids);
    let canonical = to_canonical_json(&ids_json);
    let definition_hash = hash_str(&canonical);
    PipelineDefinition::new(stages, definition_hash)
}

/// Builder alternativo: extrae los ids en orden de las propias etapas, para
/// no mantener a mano el arreglo `stage_ids`.
pub fn build_pipeline_definition_auto(stages: Vec<Box<dyn StageDefinition>>) -> PipelineDefinition {
    let ids: Vec<String> = stages.iter().map(|s| s.id().to_string()).collect();
    let id_refs: Vec<&str> = ids.iter().map(|s| s.as_str()).collect();
    build_pipeline_definition(&id_refs, stages)
}
