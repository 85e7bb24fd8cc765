use serde::{Deserialize, Serialize};

use crate::datos::Registro;

/// Ficha de un proyecto en la hoja `Proyectos`.
///
/// Los proyectos se crean fuera del sistema (registro manual); desde aquí se
/// leen como filas cabecera→valor y se tratan como solo-lectura.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proyecto {
    pub proyecto_id: String,
    pub nombre_proyecto: String,
    pub promotor_representante: String,
    pub licencia_ambiental: String,
    pub sector_productivo: String,
    pub ubicacion_politica: String,
    pub area: String,
}

impl Proyecto {
    /// Cabeceras esperadas de la hoja `Proyectos`, en orden de columna.
    pub fn headers() -> &'static [&'static str] {
        &["proyecto_id",
          "nombre_proyecto",
          "promotor_representante",
          "licencia_ambiental",
          "sector_productivo",
          "ubicacion_politica",
          "area"]
    }

    /// Construye desde un registro cabecera→valor. Campos ausentes quedan
    /// vacíos.
    pub fn from_registro(reg: &Registro) -> Self {
        let get = |k: &str| reg.get(k).cloned().unwrap_or_default();
        Self { proyecto_id: get("proyecto_id"),
               nombre_proyecto: get("nombre_proyecto"),
               promotor_representante: get("promotor_representante"),
               licencia_ambiental: get("licencia_ambiental"),
               sector_productivo: get("sector_productivo"),
               ubicacion_politica: get("ubicacion_politica"),
               area: get("area") }
    }

    /// Registro cabecera→valor (mismo orden que `headers`). Usado al anexar
    /// un proyecto respetando el orden de columnas vigente.
    pub fn to_registro(&self) -> Registro {
        let mut reg = Registro::new();
        reg.insert("proyecto_id".into(), self.proyecto_id.clone());
        reg.insert("nombre_proyecto".into(), self.nombre_proyecto.clone());
        reg.insert("promotor_representante".into(), self.promotor_representante.clone());
        reg.insert("licencia_ambiental".into(), self.licencia_ambiental.clone());
        reg.insert("sector_productivo".into(), self.sector_productivo.clone());
        reg.insert("ubicacion_politica".into(), self.ubicacion_politica.clone());
        reg.insert("area".into(), self.area.clone());
        reg
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_registro_defaults_missing_fields() {
        let mut reg = Registro::new();
        reg.insert("proyecto_id".into(), "P-001".into());
        reg.insert("area".into(), "12 ha".into());
        let p = Proyecto::from_registro(&reg);
        assert_eq!(p.proyecto_id, "P-001");
        assert_eq!(p.area, "12 ha");
        assert_eq!(p.nombre_proyecto, "");
    }

    #[test]
    fn to_registro_preserves_header_order() {
        let p = Proyecto { proyecto_id: "P-002".into(),
                           ..Default::default() };
        let reg = p.to_registro();
        let keys: Vec<&str> = reg.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, Proyecto::headers());
    }
}
