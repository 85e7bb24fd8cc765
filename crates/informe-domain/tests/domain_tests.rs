use informe_domain::{document_file_name, format_report_number_for_year, DatosInforme, Informe, Proyecto, Registro};

fn registro(pairs: &[(&str, &str)]) -> Registro {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn merged_record_feeds_file_name() {
    // Flujo típico: fila de proyecto + fila de informe → datos combinados →
    // nombre de archivo con el número asignado.
    let proyecto = registro(&[("proyecto_id", "P-9"),
                              ("nombre_proyecto", "Relleno Sanitario Sur"),
                              ("area", "4.5 ha")]);
    let informe = registro(&[("id_informe", "REP-31"),
                             ("proyecto_id", "P-9"),
                             ("cliente", "GAD Municipal"),
                             ("fecha", "05/08/2026")]);
    let datos = DatosInforme::from_registros(Some(&proyecto), &informe);
    assert_eq!(datos.area, "4.5 ha");
    assert_eq!(datos.nombre_base(), "Relleno Sanitario Sur");

    let numero = format_report_number_for_year(31, "INF", 5, 2026);
    let archivo = document_file_name(&numero, datos.nombre_base(), &datos.cliente, &datos.fecha);
    assert_eq!(archivo, "INF-2026-00031_Relleno_Sanitario_Sur_GAD_Municipal_05-08-2026.docx");
}

#[test]
fn informe_roundtrip_from_sheet_row() {
    let fila = registro(&[("id_informe", "REP-31"),
                          ("responsable", "C. Guzmán"),
                          ("imagenes_drive_ids", "AAAAAAAAAAAAAAAAAAAA, BBBBBBBBBBBBBBBBBBBB")]);
    let inf = Informe::from_registro(&fila);
    assert_eq!(inf.responsable, "C. Guzmán");
    assert_eq!(inf.imagenes_crudas().len(), 2);
}

#[test]
fn proyecto_headers_match_registro_keys() {
    let p = Proyecto { proyecto_id: "P-1".into(),
                       nombre_proyecto: "Granja Avícola".into(),
                       ..Default::default() };
    let reg = p.to_registro();
    assert_eq!(reg.len(), Proyecto::headers().len());
    assert_eq!(Proyecto::from_registro(&reg), p);
}
