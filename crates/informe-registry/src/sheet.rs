//! Contrato mínimo sobre el backend de hojas de cálculo.
//!
//! El registro requiere exactamente estas operaciones (abrir por
//! identificador ya viene resuelto por el cliente concreto): obtener/crear
//! hoja por nombre, leer todas las filas como registros, anexar fila, leer
//! la primera fila (cabeceras), escribir un rango y contar filas. La
//! garantía de serialización de appends es del backend; este sistema no
//! añade bloqueos propios.

use informe_domain::Registro;

use crate::error::RegistryError;

pub trait SheetClient: Send + Sync {
    /// Garantiza que la hoja exista (la crea vacía si falta).
    fn ensure_worksheet(&self, tab: &str) -> Result<(), RegistryError>;

    /// Primera fila de la hoja (cabeceras). Vacía si la hoja está en blanco.
    fn first_row(&self, tab: &str) -> Result<Vec<String>, RegistryError>;

    /// Escribe un rango rectangular empezando en la fila/columna indicadas
    /// (base 1).
    fn update_range(&self,
                    tab: &str,
                    start_row: usize,
                    start_col: usize,
                    values: Vec<Vec<String>>)
                    -> Result<(), RegistryError>;

    /// Anexa una fila al final de la hoja.
    fn append_row(&self, tab: &str, row: Vec<String>) -> Result<(), RegistryError>;

    /// Número total de filas con contenido (incluida la cabecera).
    fn row_count(&self, tab: &str) -> Result<usize, RegistryError>;

    /// Todas las filas de datos como registros cabecera→valor.
    fn read_records(&self, tab: &str) -> Result<Vec<Registro>, RegistryError>;
}
