//! informe-files: resolución y descarga de imágenes del almacén de archivos.
//!
//! Dos responsabilidades, ambas de mejor esfuerzo:
//! - normalizar lo que escribe el usuario (IDs sueltos o URLs completas) a
//!   identificadores válidos, únicos y en orden de primera aparición;
//! - descargar los binarios, omitiendo en silencio los que fallen: un set
//!   parcial de imágenes jamás aborta la generación del informe.

pub mod error;
pub mod ids;
pub mod store;

pub use error::FileStoreError;
pub use ids::{extract_file_id, normalize_ids};
pub use store::{download_all, download_each, Descarga, FileStore, HttpFileStore, InMemoryFileStore};
