//! Contexto ergonómico de corrida.

use uuid::Uuid;

use crate::engine::PipelineEngine;
use crate::errors::EngineError;
use crate::event::EventStore;
use crate::repo::{PipelineDefinition, PipelineRepository};

/// API ergonómica para avanzar una corrida concreta dentro de un motor.
pub struct PipelineCtx<'a, E: EventStore, R: PipelineRepository> {
    pub engine: &'a mut PipelineEngine<E, R>,
    pub run_id: Uuid,
    pub definition: &'a PipelineDefinition,
}

impl<'a, E: EventStore, R: PipelineRepository> PipelineCtx<'a, E, R> {
    #[inline]
    pub fn new(engine: &'a mut PipelineEngine<E, R>, run_id: Uuid, definition: &'a PipelineDefinition) -> Self {
        Self { engine,
               run_id,
               definition }
    }

    /// Ejecuta la siguiente etapa de la corrida.
    #[inline]
    pub fn step(&mut self) -> Result<(), EngineError> {
        self.engine.next_with(self.run_id, self.definition)
    }

    /// Ejecuta hasta `n` etapas o hasta el primer error terminal.
    #[inline]
    pub fn run_n(&mut self, n: usize) -> Result<(), EngineError> {
        for _ in 0..n {
            match self.step() {
                Ok(()) => continue,
                Err(EngineError::RunCompleted) => return Ok(()),
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }

    /// Ejecuta etapas hasta que la corrida complete o falle terminalmente.
    #[inline]
    pub fn run_to_completion(&mut self) -> Result<(), EngineError> {
        loop {
            match self.step() {
                Ok(()) => continue,
                Err(EngineError::RunCompleted) => return Ok(()),
                Err(e) => return Err(e),
            }
        }
    }
}
