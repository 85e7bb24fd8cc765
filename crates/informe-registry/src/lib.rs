//! informe-registry
//!
//! Acceso al registro compartido respaldado por una hoja de cálculo: tres
//! tablas lógicas (Proyectos, Informes y el contador de secuencia) con
//! semántica crear-si-no-existe. Expone:
//! - `SheetClient`: el contrato mínimo sobre el backend (abrir/crear hoja,
//!   leer registros, anexar fila, contar filas, leer/escribir cabeceras).
//! - `InMemorySheetClient`: backend en memoria para tests y modo demo.
//! - `RestSheetClient`: adaptador HTTP delgado sobre la API de valores del
//!   backend real; el token es estático (la renovación de credenciales queda
//!   fuera de este sistema).
//! - `Registry`: operaciones de alto nivel sobre las tablas, incluida la
//!   reserva de secuencia (`reserve_sequence`).

pub mod config;
pub mod error;
pub mod memory;
pub mod registry;
pub mod rest;
pub mod sequence;
pub mod sheet;

pub use config::{init_dotenv, RegistryConfig};
pub use error::RegistryError;
pub use memory::InMemorySheetClient;
pub use registry::{Registry, REPORT_LOG_HEADERS, SEQUENCE_HEADERS};
pub use sequence::local_timestamp;
pub use rest::RestSheetClient;
pub use sheet::SheetClient;
