//! Generic create/edit page model.
//!
//! DESIGN
//! ======
//! An entity form is a plain struct of raw input strings plus typed
//! selections. `Form::validate` turns it into the wire payload or the first
//! failing message; `FormPage::submit` runs validation before anything
//! touches the network, so an invalid form never sends a request.
//!
//! Changing the selected company resets the company-dependent fields and
//! reloads the dependent selects through `CompanyLookups`.

#[cfg(test)]
#[path = "form_test.rs"]
mod form_test;

use futures::future::join_all;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;

use super::Route;
use crate::net::api::{ApiClient, collection_path, item_path};
use crate::net::error::{ApiError, ENCODE_ALERT, FormError};
use crate::net::transport::{Method, RequestBody};
use crate::net::types::LookupOption;
use crate::state::data_source::settle;
use crate::state::lookups::{CompanyLookups, LookupKind, fetch_companies};

const COMPANIES_FAILED: &str = "No se pudieron cargar las empresas.";
pub const COMPANY_LOCKED: &str = "La empresa no es editable.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitOutcome {
    pub message: &'static str,
    pub redirect: Route,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("campo desconocido `{0}`")]
    Unknown(String),
    #[error("valor inválido para `{field}`: {value}")]
    Invalid { field: String, value: String },
    /// A list editor (objectives, recipients) refused the entry.
    #[error("{0}")]
    Rejected(&'static str),
}

impl FieldError {
    pub(crate) fn invalid(field: &str, value: &str) -> Self {
        Self::Invalid { field: field.to_owned(), value: value.to_owned() }
    }
}

/// A file picked for upload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

pub trait Form {
    type Payload: Serialize;

    /// Apply one input change by field name.
    ///
    /// # Errors
    ///
    /// `Unknown` for a field the form does not have, `Invalid` for a value a
    /// select/checkbox cannot take.
    fn handle_change(&mut self, field: &str, value: &str) -> Result<(), FieldError>;

    /// Build the payload, or return the first validation message.
    ///
    /// # Errors
    ///
    /// The Spanish message of the first failing rule.
    fn validate(&self) -> Result<Self::Payload, &'static str>;
}

/// Binds a form to its REST resource and console route.
pub trait EntityForm: Form + Clone + Default + Send + Sync + 'static {
    type Record: DeserializeOwned + Send;

    /// Path segment under `/api/`.
    const RESOURCE: &'static str;
    const ROUTE: Route;
    const LOOKUPS: &'static [LookupKind] = &[];
    const NEEDS_COMPANIES: bool = true;
    const CREATED: &'static str;
    const UPDATED: &'static str;
    const CREATE_FAILED: &'static str;
    const UPDATE_FAILED: &'static str;
    const LOAD_FAILED: &'static str = "No se pudieron cargar los datos.";

    fn from_record(record: Self::Record) -> Self;

    fn empresa_id(&self) -> Option<i64>;

    /// Clear selections that belong to the previously selected company.
    fn reset_dependents(&mut self) {}

    /// # Errors
    ///
    /// `Unknown` unless the form has a file field named `field`.
    fn attach_file(&mut self, field: &str, _file: Attachment) -> Result<(), FieldError> {
        Err(FieldError::Unknown(field.to_owned()))
    }

    fn create_target() -> (Method, String) {
        (Method::Post, collection_path(Self::RESOURCE))
    }

    fn update_target(id: i64) -> (Method, String) {
        (Method::Put, item_path(Self::RESOURCE, id))
    }

    /// # Errors
    ///
    /// `Validation` with the first failing rule.
    fn create_body(&self) -> Result<RequestBody, FormError> {
        json_body(&validated(self.validate())?)
    }

    /// # Errors
    ///
    /// `Validation` with the first failing rule.
    fn update_body(&self) -> Result<RequestBody, FormError> {
        self.create_body()
    }
}

pub(crate) fn validated<P>(result: Result<P, &'static str>) -> Result<P, FormError> {
    result.map_err(|message| FormError::Validation(message.to_owned()))
}

pub(crate) fn json_body<P: Serialize>(payload: &P) -> Result<RequestBody, FormError> {
    serde_json::to_value(payload)
        .map(RequestBody::Json)
        .map_err(|e| FormError::api(ApiError::Encode(e.to_string()), ENCODE_ALERT))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

pub struct FormPage<F: EntityForm> {
    api: ApiClient,
    mode: FormMode,
    form: F,
    companies: Vec<LookupOption>,
    lookups: CompanyLookups,
    pending: Vec<JoinHandle<()>>,
}

impl<F: EntityForm> FormPage<F> {
    /// Mount an empty create form and load the company select.
    ///
    /// # Errors
    ///
    /// `Api` when the company list cannot be loaded.
    pub async fn create(api: &ApiClient) -> Result<Self, FormError> {
        let companies = load_companies::<F>(api).await?;
        Ok(Self {
            api: api.clone(),
            mode: FormMode::Create,
            form: F::default(),
            companies,
            lookups: CompanyLookups::new(api, F::LOOKUPS),
            pending: Vec::new(),
        })
    }

    /// Mount an edit form prefilled from the stored record, with the
    /// dependent selects already loaded for its company.
    ///
    /// # Errors
    ///
    /// `Api` when the record or the company list cannot be loaded.
    pub async fn edit(api: &ApiClient, id: i64) -> Result<Self, FormError> {
        let record: F::Record = api
            .get_json(&item_path(F::RESOURCE, id))
            .await
            .map_err(|error| FormError::api(error, F::LOAD_FAILED))?;
        let form = F::from_record(record);
        let companies = load_companies::<F>(api).await?;
        let lookups = CompanyLookups::new(api, F::LOOKUPS);
        lookups.load_company(form.empresa_id()).await;
        tracing::debug!(resource = F::RESOURCE, id, "edit form loaded");

        Ok(Self { api: api.clone(), mode: FormMode::Edit(id), form, companies, lookups, pending: Vec::new() })
    }

    #[must_use]
    pub fn mode(&self) -> FormMode {
        self.mode
    }

    #[must_use]
    pub fn form(&self) -> &F {
        &self.form
    }

    /// Direct access for form-specific actions (adding objectives,
    /// recipients). Company changes must go through `handle_change`.
    pub fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    #[must_use]
    pub fn companies(&self) -> &[LookupOption] {
        &self.companies
    }

    #[must_use]
    pub fn lookups(&self) -> &CompanyLookups {
        &self.lookups
    }

    #[must_use]
    pub fn options(&self, kind: LookupKind) -> Vec<LookupOption> {
        self.lookups.options(kind)
    }

    /// Apply an input change; a company change reloads dependent selects.
    /// The company of a record being edited is fixed.
    ///
    /// # Errors
    ///
    /// Whatever the form rejects, or `Rejected` for a company change while
    /// editing (the form is left untouched).
    pub fn handle_change(&mut self, field: &str, value: &str) -> Result<(), FieldError> {
        let before = self.form.empresa_id();
        let mut next = self.form.clone();
        next.handle_change(field, value)?;
        let after = next.empresa_id();
        if before != after {
            if let FormMode::Edit(id) = self.mode {
                tracing::debug!(resource = F::RESOURCE, id, field, "company change refused while editing");
                return Err(FieldError::Rejected(COMPANY_LOCKED));
            }
            next.reset_dependents();
            self.pending = self.lookups.select_company(after);
        }
        self.form = next;
        Ok(())
    }

    /// # Errors
    ///
    /// Whatever the form rejects.
    pub fn attach_file(&mut self, field: &str, file: Attachment) -> Result<(), FieldError> {
        self.form.attach_file(field, file)
    }

    /// Wait until lookups triggered by the last company change settle.
    pub async fn wait_for_lookups(&mut self) {
        join_all(self.pending.drain(..).map(settle)).await;
    }

    /// Validate and send. Nothing is sent when validation fails.
    ///
    /// # Errors
    ///
    /// `Validation` for the first failing rule, `Api` for a rejected request.
    pub async fn submit(&self) -> Result<SubmitOutcome, FormError> {
        let (method, path, body, message, fallback) = match self.mode {
            FormMode::Create => {
                let body = self.form.create_body()?;
                let (method, path) = F::create_target();
                (method, path, body, F::CREATED, F::CREATE_FAILED)
            }
            FormMode::Edit(id) => {
                let body = self.form.update_body()?;
                let (method, path) = F::update_target(id);
                (method, path, body, F::UPDATED, F::UPDATE_FAILED)
            }
        };

        self.api
            .send(method, &path, body)
            .await
            .map_err(|error| FormError::api(error, fallback))?;
        tracing::info!(resource = F::RESOURCE, method = method.as_str(), %path, "form submitted");
        Ok(SubmitOutcome { message, redirect: F::ROUTE })
    }
}

async fn load_companies<F: EntityForm>(api: &ApiClient) -> Result<Vec<LookupOption>, FormError> {
    if !F::NEEDS_COMPANIES {
        return Ok(Vec::new());
    }
    fetch_companies(api)
        .await
        .map_err(|error| FormError::api(error, COMPANIES_FAILED))
}
