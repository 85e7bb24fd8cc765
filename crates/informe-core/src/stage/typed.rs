use serde::{de::DeserializeOwned, Serialize};

use super::{StageKind, StageNote, StageRunResult};
use crate::errors::EngineError;
use crate::model::ArtifactSpec;

/// Resultado tipado de ejecutar un `TypedStage`.
///
/// Permite trabajar con outputs fuertemente tipados durante la
/// implementación de etapas y convertirlos a la representación neutra que
/// el motor usa.
pub enum StageRunResultTyped<Out: ArtifactSpec + Clone> {
    Success { outputs: Vec<Out> },
    SuccessWithNotes { outputs: Vec<Out>, notes: Vec<StageNote> },
    Failure { error: EngineError },
}

impl<Out: ArtifactSpec + Clone> StageRunResultTyped<Out> {
    /// Convierte a `StageRunResult` neutro serializando los outputs a
    /// `Artifact` mediante `ArtifactSpec::into_artifact`.
    pub fn into_neutral(self) -> StageRunResult {
        match self {
            StageRunResultTyped::Success { outputs } => {
                let arts = outputs.into_iter().map(|o| o.into_artifact()).collect();
                StageRunResult::Success { outputs: arts }
            }
            StageRunResultTyped::SuccessWithNotes { outputs, notes } => {
                let arts = outputs.into_iter().map(|o| o.into_artifact()).collect();
                StageRunResult::SuccessWithNotes { outputs: arts, notes }
            }
            StageRunResultTyped::Failure { error } => StageRunResult::Failure { error },
        }
    }
}

/// Interfaz de alto nivel para definir etapas con tipos fuertes
/// (Params / Input / Output).
///
/// Implementadores escriben `run_typed` con tipos concretos; el adaptador de
/// abajo convierte esa ejecución a la interfaz neutra `StageDefinition`.
pub trait TypedStage {
    /// Parámetros deserializables y clonables (soportan `Default`).
    type Params: DeserializeOwned + Serialize + Clone + Default;
    /// Tipo concreto esperado como input (implementa `ArtifactSpec`).
    type Input: ArtifactSpec + Clone;
    /// Tipo concreto producido como output (implementa `ArtifactSpec`).
    type Output: ArtifactSpec + Clone;

    /// Identificador estable de la etapa dentro del pipeline.
    fn id(&self) -> &'static str;

    /// Nombre amigable (por defecto usa el id).
    fn name(&self) -> &str {
        self.id()
    }

    /// Tipo general de la etapa.
    fn kind(&self) -> StageKind;

    /// Parámetros por defecto.
    fn params_default(&self) -> Self::Params {
        Default::default()
    }

    /// Ejecución tipada. Para `Source`, `input` será `None`.
    fn run_typed(&self, input: Option<Self::Input>, params: Self::Params) -> StageRunResultTyped<Self::Output>;
}

// -------------------------------------------------------------
// Adaptador: cualquier `TypedStage` implementa `StageDefinition` neutro.
// -------------------------------------------------------------
impl<T> crate::stage::StageDefinition for T where T: TypedStage + 'static + std::fmt::Debug
{
    fn id(&self) -> &str {
        <Self as TypedStage>::id(self)
    }

    fn name(&self) -> &str {
        <Self as TypedStage>::name(self)
    }

    fn base_params(&self) -> serde_json::Value {
        serde_json::to_value(self.params_default()).unwrap_or(serde_json::Value::Null)
    }

    fn run(&self, ctx: &crate::model::StageContext) -> StageRunResult {
        // Decodifica los params (si fallan, usa defaults de la etapa)
        let params: <Self as TypedStage>::Params = ctx.params_as().unwrap_or_else(|_| self.params_default());

        // Decodifica el input si existe; un artifact ilegible es un error
        // terminal de la etapa, no un panic.
        let typed_in: Option<<Self as TypedStage>::Input> = match ctx.input.as_ref() {
            None => None,
            Some(a) => match <Self as TypedStage>::Input::from_artifact(a) {
                Ok(v) => Some(v),
                Err(e) => {
                    return StageRunResult::Failure { error: EngineError::Internal(format!("input artifact decode: {}",
                                                                                          e)) }
                }
            },
        };

        <Self as TypedStage>::run_typed(self, typed_in, params).into_neutral()
    }

    fn kind(&self) -> StageKind {
        <Self as TypedStage>::kind(self)
    }

    fn definition_hash(&self) -> String {
        let hash_input = serde_json::json!({
            "id": <Self as TypedStage>::id(self),
            "kind": format!("{:?}", <Self as TypedStage>::kind(self)),
            "base_params": serde_json::to_value(self.params_default()).unwrap_or(serde_json::Value::Null),
            "type": std::any::type_name::<T>()
        });
        crate::hashing::hash_value(&hash_input)
    }
}
