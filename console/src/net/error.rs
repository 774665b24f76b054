//! Error taxonomy for API calls and form submissions.
//!
//! ERROR HANDLING
//! ==============
//! Every failure ends up as a short Spanish alert shown to the operator.
//! `ApiError` keeps the transport/status detail for logs, and
//! `alert_message_or` picks the server's `detail` text when present,
//! falling back to the caller's operation-specific message otherwise.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde_json::Value;

use super::transport::{ApiResponse, TransportError};
use crate::pages::Route;

pub const CONNECTION_ALERT: &str = "Error de conexión con el servidor.";
pub const NO_SESSION_ALERT: &str = "No hay sesión activa. Inicia sesión.";
pub const INCOMPLETE_RESPONSE_ALERT: &str = "Respuesta incompleta del servidor.";
pub const ENCODE_ALERT: &str = "No se pudo preparar la solicitud.";
pub const STORAGE_ALERT: &str = "No se pudo guardar la sesión.";
pub const GENERIC_ALERT: &str = "No se pudo completar la operación.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// Network failure before any HTTP status was received.
    #[error("connection failed: {0}")]
    Connection(String),
    /// Non-2xx response after the optional token refresh.
    #[error("HTTP {status}")]
    Status { status: u16, detail: Option<String> },
    /// No access token in the active session.
    #[error("no active session")]
    Unauthenticated,
    #[error("response decode failed: {0}")]
    Decode(String),
    #[error("request encode failed: {0}")]
    Encode(String),
}

impl ApiError {
    #[must_use]
    pub fn from_response(response: &ApiResponse) -> Self {
        Self::Status { status: response.status, detail: extract_detail(&response.body) }
    }

    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    #[must_use]
    pub fn alert_message(&self) -> String {
        self.alert_message_or(GENERIC_ALERT)
    }

    /// Alert text for this error, using `fallback` when the server gave none.
    #[must_use]
    pub fn alert_message_or(&self, fallback: &str) -> String {
        match self {
            Self::Connection(_) => CONNECTION_ALERT.to_owned(),
            Self::Status { detail: Some(detail), .. } => detail.clone(),
            Self::Status { detail: None, .. } => fallback.to_owned(),
            Self::Unauthenticated => NO_SESSION_ALERT.to_owned(),
            Self::Decode(_) => INCOMPLETE_RESPONSE_ALERT.to_owned(),
            Self::Encode(_) => ENCODE_ALERT.to_owned(),
        }
    }

    /// Where the console should navigate after this error, if anywhere.
    #[must_use]
    pub fn redirect(&self) -> Option<Route> {
        match self {
            Self::Unauthenticated | Self::Status { status: 401, .. } => Some(Route::Login),
            _ => None,
        }
    }
}

impl From<TransportError> for ApiError {
    fn from(error: TransportError) -> Self {
        Self::Connection(error.to_string())
    }
}

/// Outcome of a rejected form submission or login attempt.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// Client-side validation failed; nothing was sent.
    #[error("{0}")]
    Validation(String),
    #[error("{error}")]
    Api { error: ApiError, fallback: &'static str },
    #[error("session store failed: {0}")]
    Storage(String),
}

impl FormError {
    #[must_use]
    pub fn api(error: ApiError, fallback: &'static str) -> Self {
        Self::Api { error, fallback }
    }

    #[must_use]
    pub fn alert_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Api { error, fallback } => error.alert_message_or(fallback),
            Self::Storage(_) => STORAGE_ALERT.to_owned(),
        }
    }

    #[must_use]
    pub fn redirect(&self) -> Option<Route> {
        match self {
            Self::Api { error, .. } => error.redirect(),
            _ => None,
        }
    }
}

/// Pull a human-readable message out of a DRF-style error body.
///
/// Prefers `detail`, then `non_field_errors`, then the first field error
/// rendered as `field: message`.
#[must_use]
pub fn extract_detail(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let object = value.as_object()?;

    if let Some(detail) = object.get("detail").and_then(first_message) {
        return Some(detail);
    }
    if let Some(message) = object.get("non_field_errors").and_then(first_message) {
        return Some(message);
    }
    object
        .iter()
        .find_map(|(field, errors)| first_message(errors).map(|message| format!("{field}: {message}")))
}

fn first_message(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(text) => Some(text.as_str()),
        Value::Array(items) => items.iter().find_map(Value::as_str),
        _ => None,
    }?;
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_owned())
}
