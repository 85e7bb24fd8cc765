//! informe-domain: tipos y funciones puras del dominio de informes.
//!
//! Este crate no toca IO: modela los registros del registro compartido
//! (Proyectos / Informes), el registro combinado que consume la plantilla y
//! las funciones puras de numeración y nombres de archivo.

pub mod archivo;
pub mod datos;
pub mod error;
pub mod informe;
pub mod numero;
pub mod proyecto;

pub use archivo::{document_file_name, safe_filename};
pub use datos::{parse_nivel_cumplimiento, DatosInforme, Registro};
pub use error::DomainError;
pub use informe::Informe;
pub use numero::{current_year, format_report_number, format_report_number_for_year};
pub use proyecto::Proyecto;
