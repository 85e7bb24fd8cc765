use std::marker::PhantomData;

use super::{StageDefinition, TypedStage};
use crate::repo::{build_pipeline_definition_auto, PipelineDefinition};

/// Marker trait para afirmar en compilación que dos tipos son el mismo.
pub trait SameAs<T> {}
impl<T> SameAs<T> for T {}

/// Encadenador tipado: garantiza en compilación que el input de la próxima
/// etapa coincide con el output de la anterior.
///
/// Uso:
///   let def = Chain::new(Primera).then(Segunda).then(Tercera).build();
pub struct Chain<S: TypedStage + 'static> {
    stages: Vec<Box<dyn StageDefinition>>,
    _out: PhantomData<<S as TypedStage>::Output>,
}

impl<S: TypedStage + std::fmt::Debug + 'static> Chain<S> {
    pub fn new(stage: S) -> Self {
        Self { stages: vec![Box::new(stage)],
               _out: PhantomData }
    }

    /// Agrega una etapa, exigiendo N::Input == S::Output en compilación.
    pub fn then<N>(mut self, next: N) -> Chain<N>
        where N: TypedStage + std::fmt::Debug + 'static,
              <N as TypedStage>::Input: SameAs<<S as TypedStage>::Output>
    {
        self.stages.push(Box::new(next));
        Chain::<N> { stages: self.stages,
                     _out: PhantomData }
    }

    /// Construye la `PipelineDefinition`; las comprobaciones de `then`
    /// aseguran la compatibilidad de adyacencia antes del boxing.
    pub fn build(self) -> PipelineDefinition {
        build_pipeline_definition_auto(self.stages)
    }
}
