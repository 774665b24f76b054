//! Company-dependent select options for create/edit forms.
//!
//! Choosing a company reloads every dependent select for that company;
//! clearing it empties them. Each select is its own `DataSource`, so a
//! quick A-then-B company change can only ever leave B's options behind.

#[cfg(test)]
#[path = "lookups_test.rs"]
mod lookups_test;

use futures::future::join_all;
use tokio::task::JoinHandle;

use super::data_source::{DataSource, LoadState, settle};
use crate::net::api::{ApiClient, collection_path, helper_path, scoped_path};
use crate::net::error::ApiError;
use crate::net::types::LookupOption;

pub const EMPRESAS_LIST_PATH: &str = "/api/listado-empresas/";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LookupKind {
    Units,
    Positions,
    Employees,
    Kpis,
    Roles,
    /// Candidate parents for an org unit (the company's units list).
    ParentUnits,
}

impl LookupKind {
    #[must_use]
    pub fn path(self, empresa_id: i64) -> String {
        match self {
            Self::Units => helper_path("unidades", empresa_id),
            Self::Positions => helper_path("puestos", empresa_id),
            Self::Employees => helper_path("empleados", empresa_id),
            Self::Kpis => helper_path("kpis", empresa_id),
            Self::Roles => helper_path("roles", empresa_id),
            Self::ParentUnits => scoped_path(&collection_path("unidades-organizacionales"), Some(empresa_id)),
        }
    }
}

/// Load the company select.
///
/// # Errors
///
/// Any [`ApiError`] from the list request.
pub async fn fetch_companies(api: &ApiClient) -> Result<Vec<LookupOption>, ApiError> {
    api.get_list(EMPRESAS_LIST_PATH).await
}

pub struct CompanyLookups {
    sources: Vec<(LookupKind, DataSource<Option<i64>, LookupOption>)>,
}

impl CompanyLookups {
    #[must_use]
    pub fn new(api: &ApiClient, kinds: &[LookupKind]) -> Self {
        let sources = kinds
            .iter()
            .map(|&kind| {
                let api = api.clone();
                let source = DataSource::new(None, move |empresa_id: Option<i64>| {
                    let api = api.clone();
                    async move {
                        match empresa_id {
                            Some(id) => api.get_list(&kind.path(id)).await,
                            None => Ok(Vec::new()),
                        }
                    }
                });
                (kind, source)
            })
            .collect();
        Self { sources }
    }

    /// Switch every select to `empresa_id`. `None` clears them.
    pub fn select_company(&self, empresa_id: Option<i64>) -> Vec<JoinHandle<()>> {
        tracing::debug!(?empresa_id, kinds = self.sources.len(), "reloading company lookups");
        match empresa_id {
            Some(_) => self.sources.iter().map(|(_, source)| source.set_query(empresa_id)).collect(),
            None => {
                for (_, source) in &self.sources {
                    source.clear();
                }
                Vec::new()
            }
        }
    }

    /// `select_company` and wait for every select to settle.
    pub async fn load_company(&self, empresa_id: Option<i64>) {
        join_all(self.select_company(empresa_id).into_iter().map(settle)).await;
    }

    #[must_use]
    pub fn options(&self, kind: LookupKind) -> Vec<LookupOption> {
        self.source(kind).map(DataSource::items).unwrap_or_default()
    }

    #[must_use]
    pub fn state(&self, kind: LookupKind) -> LoadState<LookupOption> {
        self.source(kind).map_or(LoadState::Idle, DataSource::state)
    }

    #[must_use]
    pub fn kinds(&self) -> Vec<LookupKind> {
        self.sources.iter().map(|(kind, _)| *kind).collect()
    }

    fn source(&self, kind: LookupKind) -> Option<&DataSource<Option<i64>, LookupOption>> {
        self.sources.iter().find(|(k, _)| *k == kind).map(|(_, source)| source)
    }
}
