//! Las siete etapas del flujo de generación, en orden de ejecución.

pub mod contexto;
pub mod datos;
pub mod imagenes;
pub mod pdf;
pub mod registro;
pub mod render;
pub mod secuencia;

pub use contexto::ConstruirContextoStage;
pub use datos::ResolverDatosStage;
pub use imagenes::ResolverImagenesStage;
pub use pdf::ConvertirPdfStage;
pub use registro::RegistrarInformeStage;
pub use render::RenderizarDocumentoStage;
pub use secuencia::ReservarSecuenciaStage;
