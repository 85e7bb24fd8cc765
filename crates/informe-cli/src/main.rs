//! CLI de operación contra el registro real.
//!
//! Uso:
//!   informe-cli proyectos
//!   informe-cli previsualizar --id <ID_INFORME>
//!   informe-cli generar --id <ID_INFORME>
//!   informe-cli generar --json <ARCHIVO>
//!
//! Requiere `GSHEET_ID` y `GOOGLE_API_TOKEN` en el entorno (o .env).

use informe_adapters::Solicitud;
use informe_domain::Informe;
use informes_rust::{AppConfig, GeneracionError, GeneradorInformes};

fn generador() -> Result<GeneradorInformes, GeneracionError> {
    let app = AppConfig::from_env()?;
    GeneradorInformes::desde_entorno(&app)
}

fn exit_code(e: &GeneracionError) -> i32 {
    match e {
        GeneracionError::NoEncontrado(_) => 4,
        _ => 5,
    }
}

fn arg_value(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag).and_then(|i| args.get(i + 1)).cloned()
}

fn main() {
    env_logger::init();
    let _ = dotenvy::dotenv();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("informe-cli: use 'proyectos', 'previsualizar' o 'generar'");
        std::process::exit(2);
    }

    match args[1].as_str() {
        "proyectos" => {
            let gen = match generador() {
                Ok(g) => g,
                Err(e) => { eprintln!("[informe-cli] {}", e); std::process::exit(exit_code(&e)); }
            };
            match gen.proyectos() {
                Ok(proyectos) => {
                    for p in proyectos {
                        println!("{}\t{}",
                                 p.get("proyecto_id").cloned().unwrap_or_default(),
                                 p.get("nombre_proyecto").cloned().unwrap_or_default());
                    }
                }
                Err(e) => { eprintln!("[informe-cli] {}", e); std::process::exit(exit_code(&e)); }
            }
        }
        "previsualizar" => {
            let id = match arg_value(&args, "--id") {
                Some(v) => v,
                None => { eprintln!("Uso: informe-cli previsualizar --id <ID_INFORME>"); std::process::exit(2); }
            };
            let gen = match generador() {
                Ok(g) => g,
                Err(e) => { eprintln!("[informe-cli] {}", e); std::process::exit(exit_code(&e)); }
            };
            match gen.previsualizar(&id) {
                Ok(datos) => match serde_json::to_string_pretty(&datos) {
                    Ok(json) => println!("{}", json),
                    Err(e) => { eprintln!("[informe-cli] serialización: {}", e); std::process::exit(5); }
                },
                Err(e) => { eprintln!("[informe-cli] {}", e); std::process::exit(exit_code(&e)); }
            }
        }
        "generar" => {
            let solicitud = if let Some(id) = arg_value(&args, "--id") {
                Solicitud::PorId { id_informe: id }
            } else if let Some(ruta) = arg_value(&args, "--json") {
                let contenido = match std::fs::read_to_string(&ruta) {
                    Ok(c) => c,
                    Err(e) => { eprintln!("[informe-cli] no se pudo leer {}: {}", ruta, e); std::process::exit(2); }
                };
                let informe: Informe = match serde_json::from_str(&contenido) {
                    Ok(i) => i,
                    Err(e) => { eprintln!("[informe-cli] JSON inválido: {}", e); std::process::exit(3); }
                };
                Solicitud::Directa { informe }
            } else {
                eprintln!("Uso: informe-cli generar --id <ID_INFORME> | --json <ARCHIVO>");
                std::process::exit(2);
            };

            let gen = match generador() {
                Ok(g) => g,
                Err(e) => { eprintln!("[informe-cli] {}", e); std::process::exit(exit_code(&e)); }
            };
            match gen.generar(solicitud) {
                Ok(r) => {
                    println!("numero_informe: {}", r.numero_informe);
                    println!("documento: {}", r.ruta_docx);
                    if let Some(pdf) = &r.archivo_pdf {
                        println!("pdf: {}", pdf);
                    }
                    println!("registrado: {}", r.registrado);
                    for adv in &r.advertencias {
                        println!("advertencia: {}", adv);
                    }
                }
                Err(e) => { eprintln!("[informe-cli] {}", e); std::process::exit(exit_code(&e)); }
            }
        }
        otro => {
            eprintln!("informe-cli: subcomando desconocido '{}'; use 'proyectos', 'previsualizar' o 'generar'", otro);
            std::process::exit(2);
        }
    }
}
