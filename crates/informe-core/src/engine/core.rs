//! Implementación central de `PipelineEngine`.

use serde_json::json;
use std::collections::HashMap;
use uuid::Uuid;

use crate::engine::EngineBuilderInit;
use crate::errors::EngineError;
use crate::event::{EventStore, PipelineEventKind};
use crate::hashing::hash_value;
use crate::model::{Artifact, StageContext};
use crate::repo::{PipelineDefinition, PipelineRepository};
use crate::StageDefinition;

/// Motor de ejecución lineal.
///
/// Orquesta la ejecución de etapas, mantiene la cache local de artifacts y
/// deja la trazabilidad de cada corrida en el `EventStore`.
pub struct PipelineEngine<E, R>
    where E: EventStore,
          R: PipelineRepository
{
    event_store: E,
    repository: R,
    artifact_store: HashMap<String, Artifact>,
    default_run_id: Option<Uuid>,
    default_definition: Option<PipelineDefinition>,
}

impl<E, R> PipelineEngine<E, R>
    where E: EventStore,
          R: PipelineRepository
{
    /// Crea un builder para configurar el motor con stores propios.
    #[inline]
    pub fn builder(event_store: E, repository: R) -> EngineBuilderInit<E, R> {
        EngineBuilderInit { event_store, repository }
    }

    /// Crea el motor con los stores proporcionados.
    pub fn new_with_stores(event_store: E, repository: R) -> Self {
        Self { event_store,
               repository,
               artifact_store: HashMap::new(),
               default_run_id: None,
               default_definition: None }
    }

    /// Recupera un artifact por su hash.
    pub fn get_artifact(&self, hash: &str) -> Option<&Artifact> {
        self.artifact_store.get(hash)
    }

    /// Acceso de lectura al event store.
    pub fn event_store(&self) -> &E {
        &self.event_store
    }

    /// Eventos de una corrida específica.
    pub fn events_for(&self, run_id: Uuid) -> Vec<crate::event::PipelineEvent> {
        self.event_store.list(run_id)
    }

    /// Asegura el evento `RunInitialized` y devuelve los eventos actuales de
    /// la corrida.
    fn load_or_init(&mut self, run_id: Uuid, definition: &PipelineDefinition) -> Vec<crate::event::PipelineEvent> {
        let mut events = self.event_store.list(run_id);
        let has_init = events.iter().any(|e| matches!(e.kind, PipelineEventKind::RunInitialized { .. }));
        if !has_init {
            let ev = self.event_store
                         .append_kind(run_id,
                                      PipelineEventKind::RunInitialized { definition_hash:
                                                                              definition.definition_hash.clone(),
                                                                          stage_count: definition.len() });
            events.push(ev);
        }
        self.default_run_id = Some(run_id);
        events
    }

    /// Define/genera un `run_id` por defecto si no existe aún y lo retorna.
    pub fn ensure_default_run_id(&mut self) -> Uuid {
        if self.default_run_id.is_none() {
            self.default_run_id = Some(Uuid::new_v4());
        }
        self.default_run_id.unwrap_or_default()
    }

    /// Fija explícitamente un `run_id` por defecto.
    pub fn set_default_run_id(&mut self, run_id: Uuid) {
        self.default_run_id = Some(run_id);
    }

    /// `run_id` por defecto si está configurado.
    pub fn default_run_id(&self) -> Option<Uuid> {
        self.default_run_id
    }

    /// Configura la definición por defecto del pipeline.
    pub fn set_default_definition(&mut self, definition: PipelineDefinition) {
        self.default_definition = Some(definition);
    }

    fn hash_and_store_outputs(&mut self, outputs: &mut [Artifact]) -> Vec<String> {
        let mut hashes: Vec<String> = Vec::with_capacity(outputs.len());
        for o in outputs.iter_mut() {
            let h = hash_value(&o.payload);
            o.hash = h.clone();
            self.artifact_store.insert(h.clone(), o.clone());
            hashes.push(h);
        }
        hashes
    }

    /// Ejecuta el pipeline completo y retorna el ID de la corrida.
    pub fn run(&mut self) -> Result<Uuid, EngineError> {
        self.run_to_completion()
    }

    /// Avanza una etapa en la corrida por defecto.
    pub fn step(&mut self) -> Result<(), EngineError> {
        self.next()
    }

    /// Ejecuta la corrida por defecto hasta completarla.
    pub fn run_to_completion(&mut self) -> Result<Uuid, EngineError> {
        let run_id = self.ensure_default_run_id();
        let def = self.default_definition
                      .take()
                      .ok_or_else(|| EngineError::Internal("no default definition configured".into()))?;

        let result = self.run_pipeline_to_completion(run_id, &def);
        self.default_definition = Some(def);
        result
    }

    /// Ejecuta una corrida específica hasta su finalización.
    pub fn run_pipeline_to_completion(&mut self,
                                      run_id: Uuid,
                                      definition: &PipelineDefinition)
                                      -> Result<Uuid, EngineError> {
        loop {
            match self.next_with(run_id, definition) {
                Ok(()) => continue,
                Err(EngineError::RunCompleted) => return Ok(run_id),
                Err(e) => return Err(e),
            }
        }
    }

    /// Ejecuta la siguiente etapa pendiente de la corrida.
    pub(crate) fn next_with(&mut self, run_id: Uuid, definition: &PipelineDefinition) -> Result<(), EngineError> {
        let events = self.load_or_init(run_id, definition);
        let instance = self.repository.load(run_id, &events, definition);

        if instance.completed {
            return Err(EngineError::RunCompleted);
        }
        if instance.failed {
            return Err(EngineError::RunHasFailed);
        }

        let cursor = instance.cursor;
        if cursor >= definition.len() {
            return Err(EngineError::RunCompleted);
        }

        let stage_def: &dyn StageDefinition = definition.stages[cursor].as_ref();
        let input = if cursor == 0 {
            None
        } else {
            instance.stages
                    .get(cursor - 1)
                    .and_then(|s| s.outputs.first())
                    .and_then(|h| self.artifact_store.get(h).cloned())
        };

        let ctx = StageContext { input,
                                 params: stage_def.base_params() };

        let _started = self.event_store.append_kind(run_id,
                                                    PipelineEventKind::StageStarted { stage_index: cursor,
                                                                                      stage_id: stage_def.id()
                                                                                                         .to_string() });

        match stage_def.run(&ctx) {
            crate::stage::StageRunResult::Success { outputs } => {
                self.handle_stage_success(run_id, cursor, stage_def, outputs, vec![], definition)
            }
            crate::stage::StageRunResult::SuccessWithNotes { outputs, notes } => {
                self.handle_stage_success(run_id, cursor, stage_def, outputs, notes, definition)
            }
            crate::stage::StageRunResult::Failure { error } => self.handle_stage_failure(run_id, cursor, stage_def, error),
        }
    }

    fn handle_stage_success(&mut self,
                            run_id: Uuid,
                            cursor: usize,
                            stage_def: &dyn StageDefinition,
                            mut outputs: Vec<Artifact>,
                            notes: Vec<crate::stage::StageNote>,
                            definition: &PipelineDefinition)
                            -> Result<(), EngineError> {
        let output_hashes = self.hash_and_store_outputs(&mut outputs);

        for n in notes {
            let _ = self.event_store.append_kind(run_id,
                                                 PipelineEventKind::StageNote { stage_index: cursor,
                                                                                stage_id: stage_def.id().to_string(),
                                                                                note: n.note,
                                                                                data: n.data });
        }

        let fp = self.calculate_stage_fingerprint(cursor, stage_def, &output_hashes, definition);

        let _finished = self.event_store.append_kind(run_id,
                                                     PipelineEventKind::StageFinished { stage_index: cursor,
                                                                                        stage_id: stage_def.id()
                                                                                                           .to_string(),
                                                                                        outputs: output_hashes.clone(),
                                                                                        fingerprint: fp.clone() });

        if cursor + 1 == definition.len() {
            self.complete_run(run_id, definition);
        }

        Ok(())
    }

    fn handle_stage_failure(&mut self,
                            run_id: Uuid,
                            cursor: usize,
                            stage_def: &dyn StageDefinition,
                            error: EngineError)
                            -> Result<(), EngineError> {
        let fp_json = json!({
            "engine_version": crate::constants::ENGINE_VERSION,
            "definition_hash": stage_def.definition_hash(),
            "stage_index": cursor,
            "params": stage_def.base_params()
        });
        let fp = hash_value(&fp_json);

        let _ = self.event_store.append_kind(run_id,
                                             PipelineEventKind::StageFailed { stage_index: cursor,
                                                                              stage_id: stage_def.id().to_string(),
                                                                              error: error.clone(),
                                                                              fingerprint: fp });

        Err(error)
    }

    fn calculate_stage_fingerprint(&self,
                                   cursor: usize,
                                   stage_def: &dyn StageDefinition,
                                   output_hashes: &[String],
                                   definition: &PipelineDefinition)
                                   -> String {
        let fp_json = json!({
            "engine_version": crate::constants::ENGINE_VERSION,
            "definition_hash": definition.definition_hash,
            "stage_index": cursor,
            "output_hashes": output_hashes,
            "params": stage_def.base_params()
        });
        hash_value(&fp_json)
    }

    fn complete_run(&mut self, run_id: Uuid, definition: &PipelineDefinition) {
        let events = self.event_store.list(run_id);
        let stage_fps: Vec<String> = events.iter()
                                           .filter_map(|e| match &e.kind {
                                               PipelineEventKind::StageFinished { fingerprint, .. } => {
                                                   Some(fingerprint.clone())
                                               }
                                               _ => None,
                                           })
                                           .collect();

        let run_fp = hash_value(&json!({
                                    "engine_version": crate::constants::ENGINE_VERSION,
                                    "definition_hash": definition.definition_hash,
                                    "stage_fingerprints": stage_fps
                                }));

        let _ = self.event_store
                    .append_kind(run_id, PipelineEventKind::RunCompleted { run_fingerprint: run_fp });
    }

    /// Avanza una etapa en la corrida por defecto.
    pub fn next(&mut self) -> Result<(), EngineError> {
        let run_id = self.ensure_default_run_id();
        let def = self.default_definition
                      .take()
                      .ok_or_else(|| EngineError::Internal("no default definition configured".into()))?;

        let result = self.next_with(run_id, &def);
        self.default_definition = Some(def);
        result
    }

    /// Eventos de la corrida por defecto.
    pub fn events(&self) -> Option<Vec<crate::event::PipelineEvent>> {
        self.default_run_id.map(|rid| self.event_store.list(rid))
    }

    /// Variante compacta de eventos de la corrida por defecto (para logs y
    /// asserts de tests).
    pub fn event_variants(&self) -> Option<Vec<&'static str>> {
        self.events().map(|events| {
                         events.iter()
                               .map(|e| match e.kind {
                                   PipelineEventKind::RunInitialized { .. } => "I",
                                   PipelineEventKind::StageStarted { .. } => "S",
                                   PipelineEventKind::StageFinished { .. } => "F",
                                   PipelineEventKind::StageFailed { .. } => "X",
                                   PipelineEventKind::StageNote { .. } => "N",
                                   PipelineEventKind::RunCompleted { .. } => "C",
                               })
                               .collect()
                     })
    }

    /// Notas acumuladas de una corrida (degradaciones no fatales).
    pub fn notes_for(&self, run_id: Uuid) -> Vec<(String, String)> {
        self.event_store
            .list(run_id)
            .into_iter()
            .filter_map(|e| match e.kind {
                PipelineEventKind::StageNote { stage_id, note, .. } => Some((stage_id, note)),
                _ => None,
            })
            .collect()
    }

    /// Fingerprint agregado de la corrida por defecto, si completó.
    pub fn run_fingerprint(&self) -> Option<String> {
        let evs = self.events()?;
        evs.iter().rev().find_map(|e| match &e.kind {
                            PipelineEventKind::RunCompleted { run_fingerprint } => Some(run_fingerprint.clone()),
                            _ => None,
                        })
    }
}

impl PipelineEngine<crate::event::InMemoryEventStore, crate::repo::InMemoryPipelineRepository> {
    /// Crea un builder con stores en memoria.
    #[inline]
    pub fn new() -> EngineBuilderInit<crate::event::InMemoryEventStore, crate::repo::InMemoryPipelineRepository> {
        EngineBuilderInit { event_store: crate::event::InMemoryEventStore::default(),
                            repository: crate::repo::InMemoryPipelineRepository::new() }
    }
}

impl Default for PipelineEngine<crate::event::InMemoryEventStore, crate::repo::InMemoryPipelineRepository> {
    fn default() -> Self {
        Self::new_with_stores(crate::event::InMemoryEventStore::default(),
                              crate::repo::InMemoryPipelineRepository::new())
    }
}
