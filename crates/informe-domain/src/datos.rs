//! Registro combinado Proyecto + Informe.
//!
//! El registro que consume la plantilla se re-modela como un struct de campos
//! nominales con default vacío, en lugar del mapa laxo original: cada
//! marcador que la plantilla espera queda cubierto en tiempo de compilación.
//! La fusión sigue operando a nivel de registro (cabecera→valor) para
//! conservar la precedencia observable: primero proyecto, después informe —
//! una clave presente en la fila de informe pisa a la del proyecto.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Fila cabecera→valor leída del registro compartido. `IndexMap` conserva el
/// orden de columnas de la hoja.
pub type Registro = IndexMap<String, String>;

/// Convierte el texto de `nivel_cumplimiento` a porcentaje numérico.
/// Acepta sufijo `%` y coma decimal; lo no interpretable vale 0.0.
pub fn parse_nivel_cumplimiento(raw: &str) -> f64 {
    let s = raw.trim().replace('%', "").replace(',', ".");
    s.trim().parse::<f64>().unwrap_or(0.0)
}

/// Datos completos de un informe listo para renderizar: campos del proyecto,
/// metadatos y cuerpo técnico de la inspección. Todo campo ausente en las
/// filas de origen queda como cadena vacía.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatosInforme {
    // Datos de proyecto
    pub proyecto_id: String,
    pub nombre_proyecto: String,
    pub promotor_representante: String,
    pub licencia_ambiental: String,
    pub sector_productivo: String,
    pub ubicacion_politica: String,
    pub area: String,
    // Metadatos del informe
    pub id_informe: String,
    pub numero_informe: String,
    pub fecha: String,
    pub responsable: String,
    // Cuerpo técnico de la inspección
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
    // Compatibilidad con plantillas anteriores
    pub proyecto: String,
    pub cliente: String,
}

impl DatosInforme {
    /// Fusiona registros fila-proyecto y fila-informe. El orden es
    /// proyecto-primero: cualquier clave presente en la fila de informe
    /// sobreescribe el valor del proyecto, incluso si viene vacía.
    pub fn from_registros(proyecto: Option<&Registro>, informe: &Registro) -> Self {
        let mut merged: Registro = Registro::new();
        if let Some(p) = proyecto {
            for (k, v) in p {
                merged.insert(k.clone(), v.clone());
            }
        }
        for (k, v) in informe {
            merged.insert(k.clone(), v.clone());
        }
        Self::from_registro(&merged)
    }

    pub fn from_registro(reg: &Registro) -> Self {
        let get = |k: &str| reg.get(k).cloned().unwrap_or_default();
        Self { proyecto_id: get("proyecto_id"),
               nombre_proyecto: get("nombre_proyecto"),
               promotor_representante: get("promotor_representante"),
               licencia_ambiental: get("licencia_ambiental"),
               sector_productivo: get("sector_productivo"),
               ubicacion_politica: get("ubicacion_politica"),
               area: get("area"),
               id_informe: get("id_informe"),
               numero_informe: get("numero_informe"),
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
               proyecto: get("proyecto"),
               cliente: get("cliente") }
    }

    /// Pares (marcador, valor) en el orden en que la plantilla los declara.
    /// Las imágenes y el gráfico no van aquí: son valores no textuales.
    pub fn campos(&self) -> Vec<(&'static str, &str)> {
        vec![("nombre_proyecto", &self.nombre_proyecto),
             ("promotor_representante", &self.promotor_representante),
             ("licencia_ambiental", &self.licencia_ambiental),
             ("sector_productivo", &self.sector_productivo),
             ("ubicacion_politica", &self.ubicacion_politica),
             ("area", &self.area),
             ("id_informe", &self.id_informe),
             ("numero_informe", &self.numero_informe),
             ("fecha", &self.fecha),
             ("responsable", &self.responsable),
             ("sitio_inspeccion", &self.sitio_inspeccion),
             ("objetivo_visita", &self.objetivo_visita),
             ("metodologia", &self.metodologia),
             ("descripcion", &self.descripcion),
             ("hallazgos", &self.hallazgos),
             ("conformidades", &self.conformidades),
             ("no_conformidades", &self.no_conformidades),
             ("acciones_inmediatas", &self.acciones_inmediatas),
             ("conclusiones", &self.conclusiones),
             ("recomendaciones", &self.recomendaciones),
             ("nivel_cumplimiento", &self.nivel_cumplimiento),
             ("proyecto", &self.proyecto),
             ("cliente", &self.cliente)]
    }

    /// Porcentaje de cumplimiento numérico derivado del campo textual.
    pub fn porcentaje(&self) -> f64 {
        parse_nivel_cumplimiento(&self.nivel_cumplimiento)
    }

    /// Nombre base del proyecto para el nombre de archivo: preferimos el
    /// campo nuevo y caemos a la clave heredada.
    pub fn nombre_base(&self) -> &str {
        if self.nombre_proyecto.is_empty() {
            &self.proyecto
        } else {
            &self.nombre_proyecto
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reg(pairs: &[(&str, &str)]) -> Registro {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn merge_project_value_survives_when_report_lacks_key() {
        let p = reg(&[("proyecto_id", "P-1"), ("area", "X")]);
        let i = reg(&[("id_informe", "INF-01")]);
        let datos = DatosInforme::from_registros(Some(&p), &i);
        assert_eq!(datos.area, "X");
        assert_eq!(datos.id_informe, "INF-01");
    }

    #[test]
    fn merge_report_key_overrides_project() {
        let p = reg(&[("area", "X")]);
        let i = reg(&[("area", "Y")]);
        let datos = DatosInforme::from_registros(Some(&p), &i);
        assert_eq!(datos.area, "Y");
    }

    #[test]
    fn merge_without_project_defaults_empty() {
        let i = reg(&[("id_informe", "INF-02")]);
        let datos = DatosInforme::from_registros(None, &i);
        assert_eq!(datos.nombre_proyecto, "");
        assert_eq!(datos.id_informe, "INF-02");
    }

    #[test]
    fn parse_nivel_handles_percent_and_comma() {
        assert_eq!(parse_nivel_cumplimiento("85%"), 85.0);
        assert_eq!(parse_nivel_cumplimiento(" 72,5 % "), 72.5);
        assert_eq!(parse_nivel_cumplimiento("n/a"), 0.0);
        assert_eq!(parse_nivel_cumplimiento(""), 0.0);
    }

    #[test]
    fn nombre_base_prefers_new_field() {
        let datos = DatosInforme { nombre_proyecto: "Planta Norte".into(),
                                   proyecto: "viejo".into(),
                                   ..Default::default() };
        assert_eq!(datos.nombre_base(), "Planta Norte");
        let legado = DatosInforme { proyecto: "viejo".into(),
                                    ..Default::default() };
        assert_eq!(legado.nombre_base(), "viejo");
    }
}
