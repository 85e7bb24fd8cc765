use serde_json::Value;

use super::run_result::StageRunResult;
use crate::model::StageContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageKind {
    Source,
    Transform,
    Sink,
}

/// Trait que define una etapa del pipeline.
pub trait StageDefinition {
    /// Identificador estable y único dentro del pipeline.
    fn id(&self) -> &str;

    /// Nombre opcional amigable.
    fn name(&self) -> &str {
        self.id()
    }

    /// Parámetros base (defaults) en forma canónica.
    fn base_params(&self) -> Value;

    /// Ejecución de la etapa sobre el contexto entregado por el motor.
    fn run(&self, ctx: &StageContext) -> StageRunResult;

    /// Tipo general de la etapa.
    fn kind(&self) -> StageKind;

    /// Hash de la definición de esta etapa (participa del fingerprint).
    fn definition_hash(&self) -> String {
        let hash_input = serde_json::json!({
            "id": self.id(),
            "kind": format!("{:?}", self.kind()),
            "base_params": self.base_params(),
        });
        crate::hashing::hash_value(&hash_input)
    }
}
