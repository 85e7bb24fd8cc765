//! Artifact neutral del pipeline.
//!
//! Un `Artifact` es la unidad de datos intercambiada entre etapas. Es
//! neutral: `payload` es JSON genérico y el motor no interpreta su
//! semántica. `hash` lo calcula el motor sobre el JSON canonicalizado y
//! sirve como identidad para trazabilidad de outputs; `metadata` anota
//! información auxiliar que no entra al hash.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tipos neutrales de artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
    /// JSON genérico sin semántica para el motor.
    GenericJson,
}

/// Artifact producido/consumido por etapas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub hash: String,            // hash canónico del payload (asignado por el motor)
    pub payload: Value,          // contenido neutro JSON
    pub metadata: Option<Value>, // información auxiliar (no entra al hash)
}

impl Artifact {
    /// Constructor interno; preferir crear artifacts a través de
    /// `ArtifactSpec::into_artifact`.
    pub(crate) fn new_unhashed(kind: ArtifactKind, payload: Value, metadata: Option<Value>) -> Self {
        Self { kind,
               hash: String::new(),
               payload,
               metadata }
    }
}
