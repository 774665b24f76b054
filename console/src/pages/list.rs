//! Generic filtered list page with the destructive-action dialog.
//!
//! SYSTEM CONTEXT
//! ==============
//! Mounting a list page starts the initial load. Filter setters (company,
//! search text, status) restart a debounced reload; the table always
//! reflects the latest filter only. Delete/toggle go through `DeleteFlow`
//! and a successful action reloads the list.

#[cfg(test)]
#[path = "list_test.rs"]
mod list_test;

use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;

use super::Route;
use crate::net::api::{ApiClient, scoped_path};
use crate::state::data_source::{DataSource, LoadState, settle};
use crate::state::delete_flow::{DeleteFlow, DeleteTarget, DestructiveAction, FlowError, FlowState};
use crate::state::list_filter::{ListFilter, Listable};
use crate::state::table::TableView;

/// Binds a record type to its list endpoint and table layout.
pub trait ListEntity: Listable + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Path segment under `/api/` for item, delete and toggle endpoints.
    const RESOURCE: &'static str;
    /// Collection endpoint the list loads from.
    const LIST_PATH: &'static str;
    const ROUTE: Route;
    /// Column headers, ending with the actions column.
    const COLUMNS: &'static [&'static str];
    /// Status toggle action segment, when the entity has one.
    const TOGGLE: Option<&'static str> = None;

    /// One cell per column.
    fn cells(&self) -> Vec<String>;

    /// Short name used in dialog texts.
    fn display_name(&self) -> String;

    /// Text of the trailing actions column.
    fn actions_cell() -> String {
        match Self::TOGGLE {
            Some(_) => "Editar | Eliminar | Cambiar estado".to_owned(),
            None => "Editar | Eliminar".to_owned(),
        }
    }
}

pub struct ListPage<T: ListEntity> {
    api: ApiClient,
    source: DataSource<ListFilter, T>,
    flow: DeleteFlow,
    debounce: Duration,
    pending: Option<JoinHandle<()>>,
}

impl<T: ListEntity> ListPage<T> {
    /// Mount with an empty filter and start the initial load.
    #[must_use]
    pub fn mount(api: &ApiClient) -> Self {
        Self::mount_with(api, ListFilter::default())
    }

    /// Mount with a preset filter (applied without debounce).
    #[must_use]
    pub fn mount_with(api: &ApiClient, filter: ListFilter) -> Self {
        let fetch_api = api.clone();
        let source = DataSource::new(filter, move |filter: ListFilter| {
            let api = fetch_api.clone();
            async move {
                let rows: Vec<T> = api.get_list(&scoped_path(T::LIST_PATH, filter.empresa_id)).await?;
                Ok(filter.apply(rows))
            }
        });
        let pending = Some(source.refresh());
        Self {
            api: api.clone(),
            source,
            flow: DeleteFlow::new(T::RESOURCE),
            debounce: api.config().filter_debounce,
            pending,
        }
    }

    /// Wait for the most recent load to finish.
    pub async fn settled(&mut self) {
        if let Some(handle) = self.pending.take() {
            settle(handle).await;
        }
    }

    #[must_use]
    pub fn filter(&self) -> ListFilter {
        self.source.query()
    }

    pub fn set_company(&mut self, empresa_id: Option<i64>) {
        self.update_filter(|filter| filter.empresa_id = empresa_id);
    }

    pub fn set_search(&mut self, search: &str) {
        let search = search.to_owned();
        self.update_filter(move |filter| filter.search = search);
    }

    pub fn set_status(&mut self, estado: Option<&str>) {
        let estado = estado.map(str::to_owned);
        self.update_filter(move |filter| filter.estado = estado);
    }

    /// Reload now with the current filter.
    pub fn refresh(&mut self) {
        self.pending = Some(self.source.refresh());
    }

    #[must_use]
    pub fn state(&self) -> LoadState<T> {
        self.source.state()
    }

    #[must_use]
    pub fn rows(&self) -> Vec<T> {
        self.source.items()
    }

    #[must_use]
    pub fn table(&self) -> TableView {
        TableView::build(T::COLUMNS, &self.source.state(), |row: &T| (row.row_id(), row.cells()))
    }

    #[must_use]
    pub fn flow(&self) -> &DeleteFlow {
        &self.flow
    }

    #[must_use]
    pub fn flow_state(&self) -> &FlowState {
        self.flow.state()
    }

    /// Open the delete warning for a loaded row.
    ///
    /// # Errors
    ///
    /// `UnknownRow` if `id` is not in the table, `OutOfOrder` if the dialog
    /// is already open.
    pub fn handle_delete_click(&mut self, id: i64) -> Result<(), FlowError> {
        let target = self.target(id, DestructiveAction::Delete)?;
        self.flow.handle_delete_click(target)
    }

    /// Open the status-toggle warning for a loaded row.
    ///
    /// # Errors
    ///
    /// `ToggleUnsupported` for entities without a toggle, otherwise as
    /// `handle_delete_click`.
    pub fn handle_toggle_click(&mut self, id: i64) -> Result<(), FlowError> {
        let action = T::TOGGLE.ok_or(FlowError::ToggleUnsupported)?;
        let target = self.target(id, DestructiveAction::Toggle(action))?;
        self.flow.handle_delete_click(target)
    }

    /// # Errors
    ///
    /// `OutOfOrder` unless the warning step is showing.
    pub fn proceed_to_confirm(&mut self) -> Result<(), FlowError> {
        self.flow.proceed_to_confirm()
    }

    /// Send the confirmed action and reload the list on success.
    ///
    /// # Errors
    ///
    /// `OutOfOrder` unless the confirm step is showing, `Failed` when the
    /// request is rejected.
    pub async fn execute_delete(&mut self) -> Result<DeleteTarget, FlowError> {
        let done = self.flow.execute_delete(&self.api).await?;
        self.refresh();
        self.settled().await;
        Ok(done)
    }

    /// # Errors
    ///
    /// `OutOfOrder` unless the success step is showing.
    pub fn close_success(&mut self) -> Result<(), FlowError> {
        self.flow.close_success()
    }

    pub fn cancel(&mut self) {
        self.flow.cancel();
    }

    fn update_filter(&mut self, edit: impl FnOnce(&mut ListFilter)) {
        self.pending = Some(self.source.update_query_debounced(self.debounce, edit));
    }

    fn target(&self, id: i64, action: DestructiveAction) -> Result<DeleteTarget, FlowError> {
        let row = self
            .source
            .items()
            .into_iter()
            .find(|row| row.row_id() == id)
            .ok_or(FlowError::UnknownRow(id))?;
        Ok(DeleteTarget { id, label: row.display_name(), action })
    }
}
