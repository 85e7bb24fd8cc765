//! Configuración de la generación de documentos.
//!
//! Se construye una sola vez al arrancar el proceso y viaja inmutable hacia
//! las etapas que la necesitan; ninguna etapa vuelve a leer el entorno.

use std::env;
use std::path::PathBuf;

use informe_render::{ChartOptions, PdfMode};

#[derive(Debug, Clone)]
pub struct GeneracionConfig {
    /// Plantilla DOCX base.
    pub template_path: PathBuf,
    /// Carpeta plana de salida de documentos generados.
    pub output_dir: PathBuf,
    /// Ancho máximo en píxeles de las imágenes incrustadas.
    pub image_max_width: u32,
    /// Prefijo del número de informe (p. ej. `INF`).
    pub numero_prefix: String,
    /// Relleno con ceros del consecutivo (p. ej. 5 → `00001`).
    pub numero_pad: usize,
    /// Paleta y geometría del gráfico de cumplimiento.
    pub chart: ChartOptions,
    /// Modo de conversión a PDF.
    pub pdf_mode: PdfMode,
}

impl GeneracionConfig {
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self { template_path: PathBuf::from(env::var("DOCX_TEMPLATE_PATH")
                                                .unwrap_or_else(|_| "report_templates/reporte_base.docx".into())),
               output_dir: PathBuf::from(env::var("OUTPUT_DIR").unwrap_or_else(|_| "downloads".into())),
               image_max_width: env::var("IMAGE_MAX_WIDTH").ok()
                                                           .and_then(|v| v.parse().ok())
                                                           .unwrap_or(500),
               numero_prefix: env::var("REPORTS_NUMBER_PREFIX").unwrap_or_else(|_| "INF".into()),
               numero_pad: env::var("REPORTS_NUMBER_PAD").ok()
                                                         .and_then(|v| v.parse().ok())
                                                         .unwrap_or(5),
               chart: ChartOptions::default(),
               pdf_mode: PdfMode::from_env_value(&env::var("PDF_ENABLED").unwrap_or_else(|_| "auto".into())) }
    }

    /// Configuración apuntando a un directorio de trabajo dado (tests y
    /// modo demo): plantilla y salida bajo ese directorio, PDF apagado.
    pub fn for_workdir(workdir: &std::path::Path) -> Self {
        Self { template_path: workdir.join("plantilla.docx"),
               output_dir: workdir.join("salida"),
               image_max_width: 500,
               numero_prefix: "INF".into(),
               numero_pad: 5,
               chart: ChartOptions::default(),
               pdf_mode: PdfMode::Off }
    }
}
