//! Login and logout workflows.
//!
//! Login posts credentials, stores the returned token pair and context in
//! the store chosen by "remember me", then fetches the operator's display
//! name. A failing `/api/auth/me/` does not undo a successful login.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use serde::Deserialize;

use super::api::ApiClient;
use super::error::{ApiError, FormError};
use super::transport::Method;
use crate::session::{SessionContext, StoreError, UserContext};

pub const LOGIN_PATH: &str = "/api/auth/login/";
pub const ME_PATH: &str = "/api/auth/me/";

const LOGIN_FAILED: &str = "Credenciales inválidas.";

#[derive(Deserialize)]
struct LoginResponse {
    #[serde(default)]
    access: Option<String>,
    #[serde(default)]
    refresh: Option<String>,
    #[serde(default)]
    context: Option<UserContext>,
}

#[derive(Deserialize)]
struct MeResponse {
    #[serde(default)]
    full_name: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoginOutcome {
    pub redirect_to: String,
    pub full_name: Option<String>,
}

/// Authenticate and establish the session.
///
/// # Errors
///
/// `Validation` for blank credentials (nothing is sent), `Api` for rejected
/// credentials or an incomplete token response, `Storage` if the session
/// store cannot be written.
pub async fn login(api: &ApiClient, email: &str, password: &str, remember: bool) -> Result<LoginOutcome, FormError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(FormError::Validation("Email obligatorio.".to_owned()));
    }
    if password.is_empty() {
        return Err(FormError::Validation("Password obligatorio.".to_owned()));
    }

    let body = serde_json::json!({ "email": email, "password": password });
    let response = api
        .send_public(Method::Post, LOGIN_PATH, &body)
        .await
        .map_err(|error| FormError::api(error, LOGIN_FAILED))?;
    if !response.is_success() {
        tracing::info!(status = response.status, "login rejected");
        return Err(FormError::api(ApiError::from_response(&response), LOGIN_FAILED));
    }

    let parsed: LoginResponse = response
        .json()
        .map_err(|e| FormError::api(ApiError::Decode(e.to_string()), LOGIN_FAILED))?;
    let (Some(access), Some(refresh), Some(context)) = (
        parsed.access.filter(|t| !t.is_empty()),
        parsed.refresh.filter(|t| !t.is_empty()),
        parsed.context.filter(|c| !c.redirect_to.is_empty()),
    ) else {
        return Err(FormError::api(
            ApiError::Decode("login response lacks access, refresh or redirect_to".to_owned()),
            LOGIN_FAILED,
        ));
    };

    let redirect_to = context.redirect_to.clone();
    let session = api.session();
    session
        .establish(
            SessionContext { access: Some(access), refresh: Some(refresh), context: Some(context), full_name: None },
            remember,
        )
        .map_err(storage_error)?;
    tracing::info!(remember, %redirect_to, "login succeeded");

    let full_name = match api.get_json::<MeResponse>(ME_PATH).await {
        Ok(me) => me.full_name.filter(|name| !name.trim().is_empty()),
        Err(error) => {
            tracing::warn!(%error, "could not fetch profile after login");
            None
        }
    };
    if let Some(name) = &full_name {
        session.set_full_name(name).map_err(storage_error)?;
    }

    Ok(LoginOutcome { redirect_to, full_name })
}

/// Drop every session key from both stores.
///
/// # Errors
///
/// Returns the first store failure.
pub fn logout(api: &ApiClient) -> Result<(), StoreError> {
    api.session().clear()?;
    tracing::info!("logged out");
    Ok(())
}

fn storage_error(error: StoreError) -> FormError {
    FormError::Storage(error.to_string())
}
