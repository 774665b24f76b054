use super::*;

#[test]
fn extract_detail_prefers_detail_field() {
    let body = r#"{"detail":"No autorizado.","email":["x"]}"#;
    assert_eq!(extract_detail(body).as_deref(), Some("No autorizado."));
}

#[test]
fn extract_detail_uses_non_field_errors() {
    let body = r#"{"non_field_errors":["Credenciales inválidas."]}"#;
    assert_eq!(extract_detail(body).as_deref(), Some("Credenciales inválidas."));
}

#[test]
fn extract_detail_formats_first_field_error() {
    let body = r#"{"codigo":["Ya existe un KPI con este código."]}"#;
    assert_eq!(
        extract_detail(body).as_deref(),
        Some("codigo: Ya existe un KPI con este código.")
    );
}

#[test]
fn extract_detail_ignores_non_json_and_blank() {
    assert_eq!(extract_detail("<html>500</html>"), None);
    assert_eq!(extract_detail(r#"{"detail":"   "}"#), None);
    assert_eq!(extract_detail("[]"), None);
}

#[test]
fn alert_uses_server_detail_when_present() {
    let err = ApiError::from_response(&ApiResponse::new(400, r#"{"detail":"Empresa inactiva."}"#));
    assert_eq!(err.alert_message_or("No se pudo crear KPI"), "Empresa inactiva.");
}

#[test]
fn alert_falls_back_without_detail() {
    let err = ApiError::from_response(&ApiResponse::new(500, ""));
    assert_eq!(err.alert_message_or("No se pudo crear KPI"), "No se pudo crear KPI");
    assert_eq!(err.status(), Some(500));
}

#[test]
fn transport_error_maps_to_connection_alert() {
    let err: ApiError = TransportError::Request("refused".to_owned()).into();
    assert_eq!(err.alert_message(), CONNECTION_ALERT);
    assert_eq!(err.status(), None);
}

#[test]
fn unauthenticated_redirects_to_login() {
    assert_eq!(ApiError::Unauthenticated.redirect(), Some(Route::Login));
    let expired = ApiError::Status { status: 401, detail: None };
    assert_eq!(expired.redirect(), Some(Route::Login));
    let conflict = ApiError::Status { status: 409, detail: None };
    assert_eq!(conflict.redirect(), None);
}

#[test]
fn form_error_alerts() {
    assert_eq!(
        FormError::Validation("El código es obligatorio.".to_owned()).alert_message(),
        "El código es obligatorio."
    );
    let api = FormError::api(ApiError::Status { status: 500, detail: None }, "No se pudo crear KPI");
    assert_eq!(api.alert_message(), "No se pudo crear KPI");
    assert_eq!(FormError::Storage("disk".to_owned()).alert_message(), STORAGE_ALERT);
}
