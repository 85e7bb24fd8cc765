//! Librería central del generador de informes.
//!
//! Capa de integración sobre los crates del workspace: configuración única
//! de proceso (`AppConfig`) y la fachada `GeneradorInformes` que ejecuta el
//! flujo completo (resolver → reservar secuencia → imágenes → contexto →
//! render → PDF → bitácora) y expone las operaciones de lectura que usa la
//! superficie de operación (listar proyectos, previsualizar un informe).

pub mod config;
pub mod generador;

pub use config::AppConfig;
pub use generador::{GeneracionError, GeneradorInformes, ResultadoGeneracion};
