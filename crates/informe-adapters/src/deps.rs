//! Dependencias compartidas por las etapas.

use std::fmt;
use std::sync::Arc;

use informe_files::FileStore;
use informe_registry::Registry;

use crate::config::GeneracionConfig;

/// Clientes y configuración que las etapas reciben al construirse.
#[derive(Clone)]
pub struct StageDeps {
    pub registry: Registry,
    pub files: Arc<dyn FileStore>,
    pub config: GeneracionConfig,
}

impl StageDeps {
    pub fn new(registry: Registry, files: Arc<dyn FileStore>, config: GeneracionConfig) -> Self {
        Self { registry,
               files,
               config }
    }
}

impl fmt::Debug for StageDeps {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StageDeps")
         .field("config", &self.config)
         .finish_non_exhaustive()
    }
}
