use super::*;
use crate::net::test_helpers::{FakeTransport, authed_client};
use crate::pages::form::FormPage;
use crate::pages::list::ListPage;
use crate::state::delete_flow::FlowState;
use serde_json::json;

fn filled_form() -> EmpresaForm {
    EmpresaForm {
        razon_social: "Acme SA".to_owned(),
        nombre_comercial: "Acme".to_owned(),
        ruc_nit: "1790012345001".to_owned(),
        pais: Pais::parse("Ecuador"),
        ..EmpresaForm::default()
    }
}

fn text_parts(body: &RequestBody) -> Vec<(String, String)> {
    let RequestBody::Multipart(parts) = body else {
        panic!("expected multipart body, got {body:?}");
    };
    parts
        .iter()
        .filter_map(|part| match part {
            FormPart::Text { name, value } => Some((name.clone(), value.clone())),
            FormPart::File { .. } => None,
        })
        .collect()
}

// =============================================================================
// Form
// =============================================================================

#[test]
fn selecting_country_fixes_currency() {
    let mut form = EmpresaForm::default();
    form.handle_change("pais", "Perú").unwrap();
    assert_eq!(form.moneda(), Some("Sol (PEN)"));
    assert!(form.handle_change("pais", "Atlántida").is_err());
    assert_eq!(form.pais.map(|p| p.id), Some(17));
}

#[test]
fn validate_requires_country() {
    let form = EmpresaForm { pais: None, ..filled_form() };
    assert_eq!(form.validate().unwrap_err(), "Selecciona un país para asignar país y moneda.");
}

#[test]
fn validate_checks_fields_in_order() {
    let form = EmpresaForm { razon_social: " ".to_owned(), ruc_nit: String::new(), ..filled_form() };
    assert_eq!(form.validate().unwrap_err(), "La razón social es obligatoria.");
}

#[test]
fn only_logo_accepts_files() {
    let mut form = EmpresaForm::default();
    let file = Attachment { filename: "a.png".into(), mime: "image/png".into(), bytes: vec![1, 2] };
    assert!(form.attach_file("foto", file.clone()).is_err());
    form.attach_file("logo", file).unwrap();
    assert!(form.logo.is_some());
}

// =============================================================================
// Create / edit
// =============================================================================

#[tokio::test]
async fn create_sends_multipart_with_logo() {
    let transport = FakeTransport::new();
    transport.on(Method::Post, "/api/crear-empresa/", 201, json!({"id": 9}));
    let mut page = FormPage::<EmpresaForm>::create(&authed_client(&transport)).await.unwrap();
    *page.form_mut() = filled_form();
    page.attach_file("logo", Attachment { filename: "a.png".into(), mime: "image/png".into(), bytes: vec![7] })
        .unwrap();

    let outcome = page.submit().await.unwrap();

    assert_eq!(outcome.message, "Empresa creada exitosamente");
    assert_eq!(outcome.redirect.path(), "/admin/empresas");
    let requests = transport.requests();
    assert_eq!(requests.len(), 1, "company select is not loaded for this form");
    let body = &requests[0].body;
    assert_eq!(
        text_parts(body),
        [
            ("razon_social".to_owned(), "Acme SA".to_owned()),
            ("nombre_comercial".to_owned(), "Acme".to_owned()),
            ("ruc_nit".to_owned(), "1790012345001".to_owned()),
            ("pais".to_owned(), "8".to_owned()),
            ("moneda".to_owned(), "8".to_owned()),
        ]
    );
    let RequestBody::Multipart(parts) = body else { unreachable!() };
    assert_eq!(parts.last().map(FormPart::name), Some("logo"));
}

#[tokio::test]
async fn edit_sends_status_to_update_endpoint() {
    let transport = FakeTransport::new();
    transport.on(
        Method::Get,
        "/api/empresas/4/",
        200,
        json!({"id": 4, "razon_social": "Acme SA", "nombre_comercial": "Acme", "ruc_nit": "1",
               "pais": 3, "moneda": 3, "estado": 1, "logo_url": "/media/a.png"}),
    );
    transport.on(Method::Put, "/api/actualizar-empresa/4/", 200, json!({}));
    let mut page = FormPage::<EmpresaForm>::edit(&authed_client(&transport), 4).await.unwrap();
    assert_eq!(page.form().logo_actual.as_deref(), Some("/media/a.png"));

    page.handle_change("estado", "inactivo").unwrap();
    let outcome = page.submit().await.unwrap();

    assert_eq!(outcome.message, "Empresa actualizada correctamente");
    let put = transport.requests().pop().unwrap();
    assert!(text_parts(&put.body).contains(&("estado".to_owned(), "2".to_owned())));
}

#[tokio::test]
async fn rejected_create_uses_server_detail() {
    let transport = FakeTransport::new();
    transport.on(Method::Post, "/api/crear-empresa/", 400, json!({"ruc_nit": ["Ya existe."]}));
    let mut page = FormPage::<EmpresaForm>::create(&authed_client(&transport)).await.unwrap();
    *page.form_mut() = filled_form();

    let err = page.submit().await.unwrap_err();

    assert_eq!(err.alert_message(), "ruc_nit: Ya existe.");
}

// =============================================================================
// List
// =============================================================================

#[tokio::test]
async fn list_shows_country_and_currency_names() {
    let transport = FakeTransport::new();
    transport.on(
        Method::Get,
        "/api/listado-empresas/",
        200,
        json!([{"id": 2, "razon_social": "Acme SA", "nombre_comercial": "Acme", "ruc_nit": "99",
                "pais": 13, "moneda": 13, "estado": 2}]),
    );
    let mut page = ListPage::<Empresa>::mount(&authed_client(&transport));
    page.settled().await;

    let table = page.table();
    let (id, cells) = table.data_rows().next().unwrap();
    assert_eq!(id, 2);
    assert_eq!(cells[4], "México");
    assert_eq!(cells[5], "Peso mexicano (MXN)");
    assert_eq!(cells[6], "inactivo");
    assert_eq!(cells[7], "Editar | Eliminar | Cambiar estado");
}

#[tokio::test]
async fn toggle_posts_to_status_action() {
    let transport = FakeTransport::new();
    transport.on(
        Method::Get,
        "/api/listado-empresas/",
        200,
        json!([{"id": 2, "razon_social": "Acme SA", "nombre_comercial": "Acme", "ruc_nit": "99", "estado": 1}]),
    );
    transport.on(Method::Patch, "/api/empresas/2/toggle-estado/", 200, json!({}));
    let mut page = ListPage::<Empresa>::mount(&authed_client(&transport));
    page.settled().await;

    page.handle_toggle_click(2).unwrap();
    page.proceed_to_confirm().unwrap();
    page.execute_delete().await.unwrap();

    assert!(matches!(page.flow_state(), FlowState::Success(_)));
    assert_eq!(transport.count(Method::Patch, "/api/empresas/2/toggle-estado/"), 1);
}
