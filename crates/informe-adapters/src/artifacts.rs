//! Artifacts tipados que fluyen entre las etapas del pipeline.
//!
//! Cada etapa recibe el artifact de la anterior, así que el estado útil se
//! acumula: el número reservado viaja junto a los datos hasta el documento
//! final. Los binarios de imagen van codificados en base64 dentro del
//! payload JSON para conservar la neutralidad del motor (el hash del
//! artifact lo calcula el engine sobre el payload canónico).

use informe_core::typed_artifact;
use informe_domain::DatosInforme;
use serde::{Deserialize, Serialize};

/// Imagen ya reprocesada, serializable dentro de un artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImagenProcesadaJson {
    pub b64: String,
    /// `png` o `jpeg`.
    pub encoding: String,
    pub width: u32,
    pub height: u32,
}

// Datos combinados Proyecto+Informe listos para numerar.
typed_artifact!(DatosArtifact {
    datos: DatosInforme,
    imagenes_crudas: Vec<String>,
});

// Consecutivo reservado y número formateado.
typed_artifact!(SecuenciaArtifact {
    datos: DatosInforme,
    imagenes_crudas: Vec<String>,
    secuencia: u64,
    numero_informe: String,
});

// Binarios descargados (los que llegaron).
typed_artifact!(ImagenesArtifact {
    datos: DatosInforme,
    secuencia: u64,
    numero_informe: String,
    imagenes_b64: Vec<String>,
    omitidas: u32,
});

// Contexto completo materializado: texto, imágenes reprocesadas y gráfico.
typed_artifact!(ContextoArtifact {
    datos: DatosInforme,
    secuencia: u64,
    numero_informe: String,
    imagenes: Vec<ImagenProcesadaJson>,
    omitidas: u32,
    ruta_grafico: String,
    porcentaje_display: String,
});

// Documento renderizado en disco (y su PDF si se logró).
typed_artifact!(DocumentoArtifact {
    secuencia: u64,
    numero_informe: String,
    proyecto_id: String,
    responsable: String,
    archivo_docx: String,
    ruta_docx: String,
    archivo_pdf: Option<String>,
    sha256: String,
    imagenes_incrustadas: u32,
    imagenes_omitidas: u32,
});

// Cierre del flujo: documento más el resultado del registro en bitácora.
typed_artifact!(RegistroArtifact {
    secuencia: u64,
    numero_informe: String,
    archivo_docx: String,
    ruta_docx: String,
    archivo_pdf: Option<String>,
    sha256: String,
    registrado: bool,
    imagenes_incrustadas: u32,
    imagenes_omitidas: u32,
});
