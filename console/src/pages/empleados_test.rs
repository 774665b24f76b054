use std::time::Duration;

use super::*;
use crate::net::test_helpers::{FakeTransport, authed_client};
use crate::net::transport::Method;
use crate::pages::form::FormPage;
use crate::pages::list::ListPage;
use serde_json::json;

fn filled_form() -> EmpleadoForm {
    EmpleadoForm {
        empresa_id: "7".to_owned(),
        unidad_id: "2".to_owned(),
        puesto_id: "5".to_owned(),
        nombres: "Ana".to_owned(),
        apellidos: "Ruiz".to_owned(),
        email: "ana@acme.test".to_owned(),
        telefono: "0999".to_owned(),
        direccion: "Av. Siempre Viva".to_owned(),
        fecha_nacimiento: "1990-04-12".to_owned(),
        ..EmpleadoForm::default()
    }
}

fn stub_lookups(transport: &FakeTransport, empresa_id: i64, unit: &str) {
    transport.on(
        Method::Get,
        &format!("/api/helpers/unidades-por-empresa/?empresa_id={empresa_id}"),
        200,
        json!([{"id": 2, "nombre": unit}]),
    );
    transport.on(
        Method::Get,
        &format!("/api/helpers/puestos-por-empresa/?empresa_id={empresa_id}"),
        200,
        json!([{"id": 5, "nombre": "Analista"}]),
    );
    transport.on(
        Method::Get,
        &format!("/api/helpers/empleados-por-empresa/?empresa_id={empresa_id}"),
        200,
        json!([{"id": 11, "nombres": "Luis", "apellidos": "Mora"}]),
    );
}

// =============================================================================
// List
// =============================================================================

#[tokio::test(start_paused = true)]
async fn company_and_status_filter_shows_only_matching_rows_after_debounce() {
    let transport = FakeTransport::new();
    transport.on(Method::Get, "/api/empleados-empresa/", 200, json!([]));
    transport.on(
        Method::Get,
        "/api/empleados-empresa/?empresa_id=7",
        200,
        json!([
            {"id": 1, "nombres": "Ana", "empresa_razon_social": "Acme", "estado": 1},
            {"id": 2, "nombres": "Bea", "empresa_razon_social": "Acme", "estado": 3}
        ]),
    );
    let mut page = ListPage::<EmpleadoEmpresa>::mount(&authed_client(&transport));
    page.settled().await;

    page.set_company(Some(7));
    page.set_status(Some("activo"));
    tokio::time::sleep(Duration::from_millis(299)).await;
    assert_eq!(transport.count(Method::Get, "/api/empleados-empresa/?empresa_id=7"), 0);

    page.settled().await;

    let ids: Vec<i64> = page.table().data_rows().map(|(id, _)| id).collect();
    assert_eq!(ids, vec![1]);
    assert_eq!(transport.count(Method::Get, "/api/empleados-empresa/?empresa_id=7"), 1);
}

#[tokio::test]
async fn row_cells_fall_back_to_na() {
    let transport = FakeTransport::new();
    transport.on(
        Method::Get,
        "/api/empleados-empresa/",
        200,
        json!([{"id": 1, "nombres": "Ana", "apellidos": "Ruiz", "email": "a@b.co", "estado": 2}]),
    );
    let mut page = ListPage::<EmpleadoEmpresa>::mount(&authed_client(&transport));
    page.settled().await;

    let table = page.table();
    let (_, cells) = table.data_rows().next().unwrap();
    assert_eq!(cells.len(), 13);
    assert_eq!(cells[2], "N/A");
    assert_eq!(cells[7], "-");
    assert_eq!(cells[11], "suspendido");
}

// =============================================================================
// Form
// =============================================================================

#[test]
fn validation_follows_field_order() {
    let form = EmpleadoForm { unidad_id: String::new(), nombres: String::new(), ..filled_form() };
    assert_eq!(form.validate().unwrap_err(), "Selecciona unidad.");

    let form = EmpleadoForm { fecha_nacimiento: String::new(), ..filled_form() };
    assert_eq!(form.validate().unwrap_err(), "Fecha de nacimiento obligatoria.");

    let form = EmpleadoForm { fecha_nacimiento: "12/04/1990".to_owned(), ..filled_form() };
    assert_eq!(form.validate().unwrap_err(), "Fecha de nacimiento inválida (AAAA-MM-DD).");
}

#[test]
fn blank_manager_serializes_as_null() {
    let payload = filled_form().validate().unwrap();
    let value = serde_json::to_value(payload).unwrap();
    assert_eq!(value["manager_id"], json!(null));
    assert_eq!(value["estado"], json!(1));
}

#[tokio::test]
async fn changing_company_clears_and_reloads_dependents() {
    let transport = FakeTransport::new();
    transport.on(Method::Get, "/api/listado-empresas/", 200, json!([{"id": 7, "razon_social": "Acme"}]));
    stub_lookups(&transport, 7, "Matriz");
    stub_lookups(&transport, 8, "Sucursal");
    let mut page = FormPage::<EmpleadoForm>::create(&authed_client(&transport)).await.unwrap();

    page.handle_change("empresa_id", "7").unwrap();
    page.wait_for_lookups().await;
    page.handle_change("unidad_id", "2").unwrap();
    page.handle_change("manager_id", "11").unwrap();

    page.handle_change("empresa_id", "8").unwrap();
    assert!(page.form().unidad_id.is_empty());
    assert!(page.form().manager_id.is_empty());
    page.wait_for_lookups().await;

    let units = page.options(LookupKind::Units);
    assert_eq!(units.len(), 1);
    assert_eq!(units[0].label(), "Sucursal");
    assert_eq!(page.options(LookupKind::Employees)[0].label(), "Luis Mora");
}

#[tokio::test]
async fn edit_loads_record_and_its_lookups() {
    let transport = FakeTransport::new();
    transport.on(Method::Get, "/api/listado-empresas/", 200, json!([]));
    transport.on(
        Method::Get,
        "/api/empleados-empresa/4/",
        200,
        json!({"id": 4, "empresa_id": 7, "unidad_id": 2, "puesto_id": 5, "nombres": "Ana",
               "apellidos": "Ruiz", "email": "ana@acme.test", "telefono": "0999",
               "direccion": "Av. Siempre Viva", "fecha_nacimiento": "1990-04-12", "estado": 1}),
    );
    stub_lookups(&transport, 7, "Matriz");
    transport.on(Method::Put, "/api/empleados-empresa/4/", 200, json!({}));

    let mut page = FormPage::<EmpleadoForm>::edit(&authed_client(&transport), 4).await.unwrap();
    assert_eq!(page.options(LookupKind::Positions)[0].label(), "Analista");

    page.handle_change("estado", "baja").unwrap();
    let outcome = page.submit().await.unwrap();

    assert_eq!(outcome.message, "Empleado actualizado.");
    let put = transport.requests().pop().unwrap();
    let RequestBody::Json(body) = put.body else { panic!("expected json body") };
    assert_eq!(body["estado"], json!(3));
    assert!(body.get("empresa_id").is_none());
}

#[tokio::test]
async fn edit_keeps_company_fixed_so_update_stays_in_one_company() {
    let transport = FakeTransport::new();
    transport.on(Method::Get, "/api/listado-empresas/", 200, json!([]));
    transport.on(
        Method::Get,
        "/api/empleados-empresa/4/",
        200,
        json!({"id": 4, "empresa_id": 7, "unidad_id": 2, "puesto_id": 5, "nombres": "Ana",
               "apellidos": "Ruiz", "email": "ana@acme.test", "telefono": "0999",
               "direccion": "Av. Siempre Viva", "fecha_nacimiento": "1990-04-12", "estado": 1}),
    );
    stub_lookups(&transport, 7, "Matriz");
    transport.on(Method::Put, "/api/empleados-empresa/4/", 200, json!({}));
    let mut page = FormPage::<EmpleadoForm>::edit(&authed_client(&transport), 4).await.unwrap();

    let err = page.handle_change("empresa_id", "8").unwrap_err();
    assert_eq!(err, FieldError::Rejected(crate::pages::form::COMPANY_LOCKED));
    assert_eq!(page.form().empresa_id, "7");
    assert_eq!(page.form().unidad_id, "2");

    page.submit().await.unwrap();
    let put = transport.requests().pop().unwrap();
    let RequestBody::Json(body) = put.body else { panic!("expected json body") };
    assert_eq!(body["unidad_id"], json!(2));
    assert_eq!(body["puesto_id"], json!(5));
    assert_eq!(transport.count(Method::Get, "/api/helpers/unidades-por-empresa/?empresa_id=8"), 0);
}
