use serde::{Deserialize, Serialize};

use crate::datos::Registro;

/// Fila de informe tal como se envía o se almacena en la hoja de informes,
/// antes de asignarle número. `proyecto_id` puede venir vacío: la asociación
/// con un proyecto es opcional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Informe {
    pub id_informe: String,
    pub proyecto_id: String,
    pub fecha: String,
    pub responsable: String,
    pub sitio_inspeccion: String,
    pub objetivo_visita: String,
    pub metodologia: String,
    pub descripcion: String,
    pub hallazgos: String,
    pub conformidades: String,
    pub no_conformidades: String,
    pub acciones_inmediatas: String,
    pub conclusiones: String,
    pub recomendaciones: String,
    pub nivel_cumplimiento: String,
    /// IDs o URLs de imágenes separados por coma, tal como los escribe el
    /// usuario en la hoja.
    pub imagenes_drive_ids: String,
    // Claves heredadas de plantillas anteriores.
    pub proyecto: String,
    pub cliente: String,
}

impl Informe {
    pub fn from_registro(reg: &Registro) -> Self {
        let get = |k: &str| reg.get(k).cloned().unwrap_or_default();
        Self { id_informe: get("id_informe"),
               proyecto_id: get("proyecto_id"),
               fecha: get("fecha"),
               responsable: get("responsable"),
               sitio_inspeccion: get("sitio_inspeccion"),
               objetivo_visita: get("objetivo_visita"),
               metodologia: get("metodologia"),
               descripcion: get("descripcion"),
               hallazgos: get("hallazgos"),
               conformidades: get("conformidades"),
               no_conformidades: get("no_conformidades"),
               acciones_inmediatas: get("acciones_inmediatas"),
               conclusiones: get("conclusiones"),
               recomendaciones: get("recomendaciones"),
               nivel_cumplimiento: get("nivel_cumplimiento"),
               imagenes_drive_ids: get("imagenes_drive_ids"),
               proyecto: get("proyecto"),
               cliente: get("cliente") }
    }

    /// Registro cabecera→valor con todos los campos del informe. Todas las
    /// claves quedan presentes: al fusionar con un proyecto, los valores del
    /// informe pisan a los del proyecto aunque vengan vacíos.
    pub fn to_registro(&self) -> Registro {
        let mut reg = Registro::new();
        reg.insert("id_informe".into(), self.id_informe.clone());
        reg.insert("proyecto_id".into(), self.proyecto_id.clone());
        reg.insert("fecha".into(), self.fecha.clone());
        reg.insert("responsable".into(), self.responsable.clone());
        reg.insert("sitio_inspeccion".into(), self.sitio_inspeccion.clone());
        reg.insert("objetivo_visita".into(), self.objetivo_visita.clone());
        reg.insert("metodologia".into(), self.metodologia.clone());
        reg.insert("descripcion".into(), self.descripcion.clone());
        reg.insert("hallazgos".into(), self.hallazgos.clone());
        reg.insert("conformidades".into(), self.conformidades.clone());
        reg.insert("no_conformidades".into(), self.no_conformidades.clone());
        reg.insert("acciones_inmediatas".into(), self.acciones_inmediatas.clone());
        reg.insert("conclusiones".into(), self.conclusiones.clone());
        reg.insert("recomendaciones".into(), self.recomendaciones.clone());
        reg.insert("nivel_cumplimiento".into(), self.nivel_cumplimiento.clone());
        reg.insert("imagenes_drive_ids".into(), self.imagenes_drive_ids.clone());
        reg.insert("proyecto".into(), self.proyecto.clone());
        reg.insert("cliente".into(), self.cliente.clone());
        reg
    }

    /// Separa `imagenes_drive_ids` por comas descartando entradas en blanco.
    /// La extracción/validación de IDs ocurre aguas abajo.
    pub fn imagenes_crudas(&self) -> Vec<String> {
        self.imagenes_drive_ids
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn imagenes_crudas_splits_and_trims() {
        let inf = Informe { imagenes_drive_ids: " abc , ,def,".into(),
                            ..Default::default() };
        assert_eq!(inf.imagenes_crudas(), vec!["abc".to_string(), "def".to_string()]);
    }

    #[test]
    fn imagenes_crudas_empty_field() {
        let inf = Informe::default();
        assert!(inf.imagenes_crudas().is_empty());
    }
}
