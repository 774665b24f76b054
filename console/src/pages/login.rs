//! Login page model: email + password with "remember me".

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use super::form::FieldError;
use crate::net::api::ApiClient;
use crate::net::auth::{self, LoginOutcome};
use crate::net::error::FormError;
use crate::util::validation::parse_bool;

#[derive(Clone, Debug, Default)]
pub struct LoginPage {
    pub email: String,
    pub password: String,
    pub remember: bool,
    pub busy: bool,
    pub error: Option<String>,
}

impl LoginPage {
    /// # Errors
    ///
    /// `Unknown` for fields other than `email`, `password`, `remember`.
    pub fn handle_change(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        match field {
            "email" => self.email = value.to_owned(),
            "password" => self.password = value.to_owned(),
            "remember" => self.remember = parse_bool(value).ok_or_else(|| FieldError::invalid(field, value))?,
            _ => return Err(FieldError::Unknown(field.to_owned())),
        }
        Ok(())
    }

    /// Submit once; a second call while busy is ignored and returns `None`.
    pub async fn submit(&mut self, api: &ApiClient) -> Option<Result<LoginOutcome, FormError>> {
        if self.busy {
            return None;
        }
        self.busy = true;
        self.error = None;
        let result = auth::login(api, &self.email, &self.password, self.remember).await;
        self.busy = false;
        if let Err(error) = &result {
            self.error = Some(error.alert_message());
            self.password.clear();
        }
        Some(result)
    }
}
