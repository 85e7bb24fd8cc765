//! Constantes del motor.

/// Versión lógica del motor. Participa en el cálculo de fingerprints: un
/// cambio de versión invalida los fingerprints previos aunque la definición
/// y los datos no cambien. Mantener estable mientras no haya cambios
/// incompatibles.
pub const ENGINE_VERSION: &str = "1.0";
