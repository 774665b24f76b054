use super::*;
use serde_json::json;

// =============================================================
// Coded enums
// =============================================================

#[test]
fn coded_enum_serializes_as_integer() {
    assert_eq!(serde_json::to_value(EstadoEmpleado::Baja).unwrap(), json!(3));
    assert_eq!(serde_json::to_value(FormatoReporte::Pdf).unwrap(), json!(3));
}

#[test]
fn coded_enum_rejects_unknown_code() {
    let err = serde_json::from_value::<UnidadKpi>(json!(9)).unwrap_err();
    assert!(err.to_string().contains("unknown UnidadKpi code 9"));
}

#[test]
fn coded_enum_parses_code_or_label() {
    assert_eq!(EstadoEmpleado::parse("2"), Some(EstadoEmpleado::Suspendido));
    assert_eq!(EstadoEmpleado::parse(" Activo "), Some(EstadoEmpleado::Activo));
    assert_eq!(UnidadKpi::parse("%"), Some(UnidadKpi::Porcentaje));
    assert_eq!(CalculoHorasExtra::parse("tope semanal"), Some(CalculoHorasExtra::TopeSemanal));
    assert_eq!(TipoReporte::parse("nomina"), None);
}

#[test]
fn coded_enum_display_uses_label() {
    assert_eq!(TipoUnidad::Departamento.to_string(), "depto");
    assert_eq!(TipoUnidad::parse("depto"), Some(TipoUnidad::Departamento));
}

// =============================================================
// Country catalogue
// =============================================================

#[test]
fn country_catalogue_pairs_currency_with_country() {
    assert_eq!(PAISES.len(), 19);
    for pais in PAISES {
        assert_eq!(pais.id, pais.moneda_id);
    }
    let panama = Pais::parse("panamá").unwrap();
    assert_eq!(panama.moneda, "Balboa (PAB) y Dólar (USD)");
    assert_eq!(Pais::parse("17").map(|p| p.nombre), Some("Perú"));
    assert!(Pais::parse("Brasil").is_none());
}

// =============================================================
// Records
// =============================================================

#[test]
fn empleado_accepts_nested_and_string_ids() {
    let row: EmpleadoEmpresa = serde_json::from_value(json!({
        "id": 4,
        "empresa_id": {"id": 7, "razon_social": "Acme"},
        "unidad_id": "12",
        "manager_id": null,
        "nombres": "Ana",
        "apellidos": "Ruiz",
        "email": "ana@acme.test",
        "estado": 1
    }))
    .unwrap();
    assert_eq!(row.empresa_id, Some(7));
    assert_eq!(row.unidad_id, Some(12));
    assert_eq!(row.manager_id, None);
    assert_eq!(row.estado(), Some(EstadoEmpleado::Activo));
}

#[test]
fn unknown_status_code_decodes_without_typed_view() {
    let row: UsuarioEmpresa = serde_json::from_value(json!({
        "id": 1, "email": "x@y.co", "estado": 99
    }))
    .unwrap();
    assert_eq!(row.estado, Some(99));
    assert_eq!(row.estado(), None);
}

#[test]
fn empresa_reads_logo_url_alias() {
    let row: Empresa = serde_json::from_value(json!({
        "id": 1, "razon_social": "Acme SA", "logo_url": "/media/logos/a.png"
    }))
    .unwrap();
    assert_eq!(row.logo.as_deref(), Some("/media/logos/a.png"));
}

#[test]
fn malformed_id_is_rejected() {
    let result = serde_json::from_value::<Kpi>(json!({
        "id": 1, "empresa": "acme", "codigo": "K1", "nombre": "Puntualidad"
    }));
    assert!(result.is_err());
}

// =============================================================
// Lookup labels
// =============================================================

#[test]
fn lookup_label_prefers_most_descriptive_field() {
    let empresa = LookupOption { id: 1, razon_social: Some("Acme SA".into()), ..Default::default() };
    assert_eq!(empresa.label(), "Acme SA");

    let empleado = LookupOption {
        id: 2,
        nombres: Some("Ana".into()),
        apellidos: Some("Ruiz".into()),
        ..Default::default()
    };
    assert_eq!(empleado.label(), "Ana Ruiz");

    let kpi = LookupOption {
        id: 3,
        codigo: Some("PUN".into()),
        nombre: Some("Puntualidad".into()),
        ..Default::default()
    };
    assert_eq!(kpi.label(), "PUN - Puntualidad");

    assert_eq!(LookupOption { id: 9, ..Default::default() }.label(), "#9");
}

#[test]
fn plantilla_tolerates_non_list_objetivos() {
    let row: PlantillaKpi = serde_json::from_value(json!({
        "id": 1, "nombre": "Base", "objetivos": {"legacy": true}
    }))
    .unwrap();
    assert!(row.objetivos.is_empty());

    let row: PlantillaKpi = serde_json::from_value(json!({
        "id": 2, "nombre": "Base",
        "objetivos": [{"kpi_id": 3, "meta": 95, "umbral_rojo": 80, "umbral_amarillo": 90}, "basura"]
    }))
    .unwrap();
    assert_eq!(row.objetivos.len(), 1);
    assert!((row.objetivos[0].meta - 95.0).abs() < f64::EPSILON);
}
