//! informe-adapters: etapas concretas del flujo de generación.
//!
//! Este crate une las hojas (registro, almacén de archivos, render) con el
//! motor neutro de informe-core: artifacts tipados que fluyen entre etapas
//! y las siete etapas del flujo — resolver datos, reservar secuencia,
//! resolver imágenes, construir contexto, renderizar documento, intentar
//! PDF y registrar en la bitácora.

pub mod artifacts;
pub mod config;
pub mod deps;
pub mod flujo;
pub mod stages;

pub use artifacts::{ContextoArtifact, DatosArtifact, DocumentoArtifact, ImagenProcesadaJson, ImagenesArtifact,
                    RegistroArtifact, SecuenciaArtifact};
pub use config::GeneracionConfig;
pub use deps::StageDeps;
pub use flujo::{build_engine, Solicitud};
