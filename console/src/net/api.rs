//! Bearer-authenticated REST client.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every page talks to the backend through `ApiClient`. It joins paths onto
//! the configured base, attaches `Authorization: Bearer <access>` from the
//! injected `Session`, and on a 401 refreshes the access token once via
//! `/api/auth/refresh/` before replaying the original request.
//!
//! ERROR HANDLING
//! ==============
//! Non-2xx responses become `ApiError::Status` carrying the server's
//! `detail` text; transport failures become `ApiError::Connection`. A
//! missing access token short-circuits with `ApiError::Unauthenticated`
//! before any request is sent.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ApiError;
use super::transport::{ApiRequest, ApiResponse, Method, RequestBody, Transport};
use crate::config::ConsoleConfig;
use crate::session::Session;

pub const REFRESH_PATH: &str = "/api/auth/refresh/";

/// Collection endpoint, e.g. `/api/kpis/`.
#[must_use]
pub fn collection_path(resource: &str) -> String {
    format!("/api/{resource}/")
}

/// Item endpoint, e.g. `/api/kpis/4/`.
#[must_use]
pub fn item_path(resource: &str, id: i64) -> String {
    format!("/api/{resource}/{id}/")
}

/// Item action endpoint, e.g. `/api/empleados-empresa/4/toggle-estado/`.
#[must_use]
pub fn action_path(resource: &str, id: i64, action: &str) -> String {
    format!("/api/{resource}/{id}/{action}/")
}

/// Append the `empresa_id` query filter when a company is selected.
#[must_use]
pub fn scoped_path(base: &str, empresa_id: Option<i64>) -> String {
    match empresa_id {
        Some(id) => format!("{base}?empresa_id={id}"),
        None => base.to_owned(),
    }
}

/// Company-scoped select helper, e.g. `/api/helpers/unidades-por-empresa/?empresa_id=3`.
#[must_use]
pub fn helper_path(kind: &str, empresa_id: i64) -> String {
    format!("/api/helpers/{kind}-por-empresa/?empresa_id={empresa_id}")
}

#[derive(Deserialize)]
struct RefreshResponse {
    #[serde(default)]
    access: Option<String>,
}

#[derive(Clone)]
pub struct ApiClient {
    config: Arc<ConsoleConfig>,
    transport: Arc<dyn Transport>,
    session: Session,
}

impl ApiClient {
    #[must_use]
    pub fn new(config: ConsoleConfig, transport: Arc<dyn Transport>, session: Session) -> Self {
        Self { config: Arc::new(config), transport, session }
    }

    #[must_use]
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// GET and decode a JSON document.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`]; `Decode` when the body does not match `T`.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Method::Get, path, RequestBody::Empty).await?;
        response.json().map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// GET a list endpoint. A non-array body yields an empty list.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`]; `Decode` when an array element does not match `T`.
    pub async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let value: Value = self.get_json(path).await?;
        match value {
            Value::Array(_) => serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string())),
            other => {
                tracing::debug!(path, kind = json_kind(&other), "list endpoint returned a non-array body");
                Ok(Vec::new())
            }
        }
    }

    /// Send a JSON body.
    ///
    /// # Errors
    ///
    /// Any [`ApiError`]; `Encode` if `body` cannot be serialized.
    pub async fn send_json<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.send(method, path, RequestBody::Json(value)).await
    }

    /// Send an authenticated request, refreshing the token once on 401.
    ///
    /// # Errors
    ///
    /// `Unauthenticated` without an access token, `Connection` on transport
    /// failure, `Status` for any final non-2xx response.
    pub async fn send(&self, method: Method, path: &str, body: RequestBody) -> Result<ApiResponse, ApiError> {
        let Some(token) = self.session.access_token() else {
            tracing::warn!(method = method.as_str(), path, "request without an active session");
            return Err(ApiError::Unauthenticated);
        };

        let url = self.config.endpoint(path);
        tracing::debug!(method = method.as_str(), %url, "api request");
        let request = ApiRequest::new(method, url).with_bearer(Some(token.as_str())).with_body(body);

        let mut response = self.transport.send(request.clone()).await?;
        if response.status == 401 {
            if let Some(fresh) = self.refresh_access().await {
                response = self.transport.send(request.with_bearer(Some(fresh.as_str()))).await?;
            }
        }

        if !response.is_success() {
            tracing::warn!(method = method.as_str(), path, status = response.status, "api request failed");
            return Err(ApiError::from_response(&response));
        }
        Ok(response)
    }

    /// Send without credentials and return the response whatever its status.
    ///
    /// # Errors
    ///
    /// `Connection` on transport failure, `Encode` for an unserializable body.
    pub async fn send_public<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<ApiResponse, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        let request = ApiRequest::new(method, self.config.endpoint(path)).with_body(RequestBody::Json(value));
        Ok(self.transport.send(request).await?)
    }

    async fn refresh_access(&self) -> Option<String> {
        let refresh = self.session.refresh_token()?;
        let response = self
            .send_public(Method::Post, REFRESH_PATH, &serde_json::json!({ "refresh": refresh }))
            .await
            .ok()?;
        if !response.is_success() {
            tracing::info!(status = response.status, "token refresh rejected");
            return None;
        }
        let access = response
            .json::<RefreshResponse>()
            .ok()?
            .access
            .filter(|token| !token.is_empty())?;
        if let Err(error) = self.session.set_access(&access) {
            tracing::warn!(%error, "refreshed token could not be stored");
        }
        tracing::debug!("access token refreshed");
        Some(access)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
