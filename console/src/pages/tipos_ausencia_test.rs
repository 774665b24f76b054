use super::*;
use crate::net::test_helpers::{FakeTransport, authed_client};
use crate::net::transport::Method;
use crate::pages::form::FormPage;
use crate::pages::list::ListPage;
use crate::state::delete_flow::FlowState;
use serde_json::json;

#[test]
fn checkboxes_accept_common_spellings() {
    let mut form = TipoAusenciaForm::default();
    form.handle_change("afecta_sueldo", "sí").unwrap();
    form.handle_change("requiere_soporte", "off").unwrap();
    assert!(form.afecta_sueldo);
    assert!(!form.requiere_soporte);
    assert!(form.handle_change("afecta_sueldo", "tal vez").is_err());
}

#[test]
fn validate_requires_company_then_name() {
    assert_eq!(TipoAusenciaForm::default().validate().unwrap_err(), "Selecciona una empresa.");
    let form = TipoAusenciaForm { empresa: "2".to_owned(), ..Default::default() };
    assert_eq!(form.validate().unwrap_err(), "El nombre es obligatorio.");
}

#[tokio::test]
async fn rejected_create_prefers_server_detail() {
    let transport = FakeTransport::new();
    transport.on(Method::Get, "/api/listado-empresas/", 200, json!([]));
    transport.on(Method::Post, "/api/tipos-ausencias/", 400, json!({"detail": "Nombre duplicado."}));
    let mut page = FormPage::<TipoAusenciaForm>::create(&authed_client(&transport)).await.unwrap();
    page.handle_change("empresa", "2").unwrap();
    page.handle_change("nombre", "Vacaciones").unwrap();

    let err = page.submit().await.unwrap_err();

    assert_eq!(err.alert_message(), "Nombre duplicado.");
}

#[tokio::test]
async fn rejected_create_without_detail_uses_fallback() {
    let transport = FakeTransport::new();
    transport.on(Method::Get, "/api/listado-empresas/", 200, json!([]));
    transport.on(Method::Post, "/api/tipos-ausencias/", 500, json!(null));
    let mut page = FormPage::<TipoAusenciaForm>::create(&authed_client(&transport)).await.unwrap();
    page.handle_change("empresa", "2").unwrap();
    page.handle_change("nombre", "Vacaciones").unwrap();

    let err = page.submit().await.unwrap_err();

    assert_eq!(err.alert_message(), "No se pudo crear");
}

#[tokio::test]
async fn delete_flow_removes_row_after_refetch() {
    let transport = FakeTransport::new();
    transport.on_once(
        Method::Get,
        "/api/tipos-ausencias/",
        200,
        json!([{"id": 3, "nombre": "Vacaciones", "afecta_sueldo": false, "requiere_soporte": true}]),
    );
    transport.on(Method::Get, "/api/tipos-ausencias/", 200, json!([]));
    transport.on(Method::Delete, "/api/tipos-ausencias/3/", 204, json!(null));
    let mut page = ListPage::<TipoAusencia>::mount(&authed_client(&transport));
    page.settled().await;
    let table = page.table();
    let (_, cells) = table.data_rows().next().unwrap();
    assert_eq!(cells, ["Vacaciones", "N/A", "No", "Sí", "Editar | Eliminar"]);

    page.handle_delete_click(3).unwrap();
    assert_eq!(page.flow().message().as_deref(), Some("¿Deseas eliminar Vacaciones?"));
    page.proceed_to_confirm().unwrap();
    page.execute_delete().await.unwrap();

    assert!(matches!(page.flow_state(), FlowState::Success(_)));
    assert_eq!(page.table().data_rows().count(), 0);
}
