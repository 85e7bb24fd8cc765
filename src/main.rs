//! Binario de validación del flujo completo (modo demo).
//!
//! Corre el pipeline de generación contra backends en memoria: siembra un
//! proyecto y un informe de ejemplo, fabrica la plantilla mínima y genera
//! el documento imprimiendo el resultado. Para operar contra el registro
//! real está `informe-cli`.

use std::sync::Arc;

use informe_adapters::{GeneracionConfig, Solicitud};
use informe_files::InMemoryFileStore;
use informe_registry::{InMemorySheetClient, Registry, RegistryConfig};
use informe_render::docx::write_minimal_template;
use informe_render::{render_compliance_chart, ChartOptions};
use informes_rust::{GeneracionError, GeneradorInformes};

const DEMO_IMG_ID: &str = "DEMO00000000000000000001";

fn demo_sheets() -> Arc<InMemorySheetClient> {
    Arc::new(
        InMemorySheetClient::new()
            .with_table("Proyectos",
                        vec![vec!["proyecto_id", "nombre_proyecto", "promotor_representante",
                                  "licencia_ambiental", "sector_productivo", "ubicacion_politica", "area"],
                             vec!["P-001", "Planta de Tratamiento Norte", "Constructora Andina S.A.",
                                  "LA-2024-117", "Saneamiento", "Cantón Quito", "12 ha"]])
            .with_table("Informes",
                        vec![vec!["id_informe", "proyecto_id", "fecha", "responsable", "cliente",
                                  "objetivo_visita", "hallazgos", "nivel_cumplimiento", "imagenes_drive_ids"],
                             vec!["DEMO-1", "P-001", "05/08/2026", "C. Guzmán", "EPMAPS",
                                  "Inspección de rutina", "Sin hallazgos mayores", "85%", DEMO_IMG_ID]]),
    )
}

fn run_demo() -> Result<(), GeneracionError> {
    let workdir = std::env::temp_dir().join(format!("informes-demo-{}", std::process::id()));
    let config = GeneracionConfig::for_workdir(&workdir);
    write_minimal_template(&config.template_path).map_err(|e| GeneracionError::Configuracion(e.to_string()))?;

    // Imagen de ejemplo para el almacén en memoria: un PNG real generado
    // por el propio renderizador de gráficos.
    let png_demo = render_compliance_chart(42.0, "demo_foto", &workdir, &ChartOptions::default())
        .map_err(|e| GeneracionError::Render(e.to_string()))?;
    let bytes = std::fs::read(&png_demo).map_err(|e| GeneracionError::Render(e.to_string()))?;
    let files = Arc::new(InMemoryFileStore::new().with_file(DEMO_IMG_ID, bytes));

    let registry = Registry::new(demo_sheets(), RegistryConfig::for_tests());
    let generador = GeneradorInformes::new(registry, files, config);

    println!("[demo] proyectos registrados:");
    for p in generador.proyectos()? {
        println!("[demo]   {} — {}",
                 p.get("proyecto_id").cloned().unwrap_or_default(),
                 p.get("nombre_proyecto").cloned().unwrap_or_default());
    }

    let vista = generador.previsualizar("DEMO-1")?;
    println!("[demo] previsualización DEMO-1: proyecto='{}' responsable='{}' cumplimiento={}",
             vista.nombre_proyecto, vista.responsable, vista.nivel_cumplimiento);

    let resultado = generador.generar(Solicitud::PorId { id_informe: "DEMO-1".into() })?;
    println!("[demo] informe {} (secuencia {})", resultado.numero_informe, resultado.secuencia);
    println!("[demo] documento: {}", resultado.ruta_docx);
    println!("[demo] sha256: {}", resultado.sha256);
    println!("[demo] registrado en bitácora: {}", resultado.registrado);
    if resultado.archivo_pdf.is_none() {
        println!("[demo] PDF: no generado (modo demo)");
    }
    for adv in &resultado.advertencias {
        println!("[demo] advertencia: {}", adv);
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let _ = dotenvy::dotenv();

    if let Err(e) = run_demo() {
        eprintln!("[demo] error: {}", e);
        std::process::exit(1);
    }
}
