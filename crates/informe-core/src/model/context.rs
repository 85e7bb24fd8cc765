use serde::de::DeserializeOwned;
use serde_json::Value;

use super::Artifact;

/// Contexto entregado a `StageDefinition::run`.
pub struct StageContext {
    pub input: Option<Artifact>, // artifact único encadenado (None en la primera etapa)
    pub params: Value,           // parámetros canónicos
}

impl StageContext {
    /// Decodifica los parámetros al tipo esperado por la etapa.
    pub fn params_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.params.clone())
    }
}
