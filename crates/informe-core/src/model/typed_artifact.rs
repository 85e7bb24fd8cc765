//! Tipado fuerte opcional sobre `Artifact` manteniendo el núcleo agnóstico.
//! Los tipos de datos concretos se describen con serde y una versión de
//! esquema estable; la decodificación verifica kind y versión.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::{Artifact, ArtifactKind};

/// Errores posibles al decodificar un artifact tipado.
#[derive(Debug)]
pub enum ArtifactDecodeError {
    KindMismatch { expected: ArtifactKind, found: ArtifactKind },
    VersionMismatch { expected: u32, found: Option<u32> },
    Deserialize(String),
    Validation(String),
}

impl std::fmt::Display for ArtifactDecodeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::KindMismatch { expected, found } => {
                write!(f, "kind mismatch: expected {:?}, found {:?}", expected, found)
            }
            Self::VersionMismatch { expected, found } => {
                write!(f, "schema_version mismatch: expected {}, found {:?}", expected, found)
            }
            Self::Deserialize(e) => write!(f, "deserialize: {}", e),
            Self::Validation(e) => write!(f, "validation: {}", e),
        }
    }
}

/// Especificación abstracta de un artifact tipado.
pub trait ArtifactSpec: Sized + Serialize + DeserializeOwned + Clone {
    /// Kind asociado (permite distinguir en runtime).
    const KIND: ArtifactKind;
    /// Versión de esquema (incrementar en cambios incompatibles).
    const SCHEMA_VERSION: u32 = 1;

    /// Validación semántica ligera, sin efectos secundarios. Opcional.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }

    /// Serializa a `Artifact` sin hash (lo añadirá el motor).
    fn into_artifact(self) -> Artifact {
        let mut value = serde_json::to_value(&self).unwrap_or(Value::Null);
        if let Value::Object(map) = &mut value {
            map.entry("schema_version".to_string()).or_insert(Value::from(Self::SCHEMA_VERSION));
        }
        Artifact::new_unhashed(Self::KIND, value, None)
    }

    /// Decodifica desde un artifact neutro verificando kind, versión y
    /// validación semántica.
    fn from_artifact(a: &Artifact) -> Result<Self, ArtifactDecodeError> {
        if a.kind != Self::KIND {
            return Err(ArtifactDecodeError::KindMismatch { expected: Self::KIND,
                                                           found: a.kind.clone() });
        }
        let found_version = a.payload.get("schema_version").and_then(|v| v.as_u64()).map(|v| v as u32);
        match found_version {
            Some(v) if v == Self::SCHEMA_VERSION => {}
            other => {
                return Err(ArtifactDecodeError::VersionMismatch { expected: Self::SCHEMA_VERSION,
                                                                  found: other })
            }
        }
        let decoded: Self = serde_json::from_value(a.payload.clone())
            .map_err(|e| ArtifactDecodeError::Deserialize(e.to_string()))?;
        decoded.validate().map_err(ArtifactDecodeError::Validation)?;
        Ok(decoded)
    }
}
