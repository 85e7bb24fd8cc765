//! Ensamblado del pipeline de generación.

use informe_core::event::InMemoryEventStore;
use informe_core::repo::InMemoryPipelineRepository;
use informe_core::PipelineEngine;
use informe_domain::Informe;
use serde::{Deserialize, Serialize};

use crate::deps::StageDeps;
use crate::stages::{ConstruirContextoStage, ConvertirPdfStage, RegistrarInformeStage, RenderizarDocumentoStage,
                    ReservarSecuenciaStage, ResolverDatosStage, ResolverImagenesStage};

/// Solicitud entrante de generación: un informe ya almacenado en el
/// registro (por id) o los campos enviados directamente.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Solicitud {
    PorId { id_informe: String },
    Directa { informe: Informe },
}

/// Motor listo para correr el flujo completo de una solicitud:
/// resolver → reservar → imágenes → contexto → render → PDF → registrar.
/// Cada corrida usa stores en memoria propios; la trazabilidad queda en el
/// log de eventos del motor.
pub fn build_engine(deps: &StageDeps,
                    solicitud: Solicitud)
                    -> PipelineEngine<InMemoryEventStore, InMemoryPipelineRepository> {
    PipelineEngine::new()
        .first_stage(ResolverDatosStage::new(deps.registry.clone(), solicitud))
        .add_stage(ReservarSecuenciaStage::new(deps.registry.clone(),
                                               deps.config.numero_prefix.clone(),
                                               deps.config.numero_pad))
        .add_stage(ResolverImagenesStage::new(deps.files.clone()))
        .add_stage(ConstruirContextoStage::new(deps.config.clone()))
        .add_stage(RenderizarDocumentoStage::new(deps.config.clone()))
        .add_stage(ConvertirPdfStage::new(deps.config.pdf_mode))
        .add_stage(RegistrarInformeStage::new(deps.registry.clone()))
        .build()
}
