//! Three-step confirmation dialog for destructive actions.
//!
//! DESIGN
//! ======
//! `Idle -> Warning -> Confirm -> Success -> Idle`. The request is only sent
//! from `Confirm`; calling a step out of order is an error and never
//! reaches the network. A failed request drops back to `Idle` with the
//! alert text. The same machine drives deletes and status toggles.

#[cfg(test)]
#[path = "delete_flow_test.rs"]
mod delete_flow_test;

use crate::net::api::{ApiClient, action_path, item_path};
use crate::net::transport::{Method, RequestBody};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DestructiveAction {
    /// `DELETE /api/{resource}/{id}/`
    Delete,
    /// `PATCH /api/{resource}/{id}/{action}/`
    Toggle(&'static str),
}

impl DestructiveAction {
    #[must_use]
    pub fn method(self) -> Method {
        match self {
            Self::Delete => Method::Delete,
            Self::Toggle(_) => Method::Patch,
        }
    }

    #[must_use]
    pub fn path(self, resource: &str, id: i64) -> String {
        match self {
            Self::Delete => item_path(resource, id),
            Self::Toggle(action) => action_path(resource, id, action),
        }
    }

    fn failure_fallback(self) -> &'static str {
        match self {
            Self::Delete => "No se pudo eliminar el registro.",
            Self::Toggle(_) => "No se pudo cambiar el estado.",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteTarget {
    pub id: i64,
    pub label: String,
    pub action: DestructiveAction,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum FlowState {
    #[default]
    Idle,
    Warning(DeleteTarget),
    Confirm(DeleteTarget),
    Success(DeleteTarget),
}

impl FlowState {
    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Warning(_) => "warning",
            Self::Confirm(_) => "confirm",
            Self::Success(_) => "success",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FlowError {
    #[error("`{attempted}` is not valid while the dialog is {state}")]
    OutOfOrder { attempted: &'static str, state: &'static str },
    #[error("no row with id {0} is loaded")]
    UnknownRow(i64),
    #[error("this list has no status toggle")]
    ToggleUnsupported,
    /// The request failed; carries the alert text.
    #[error("{0}")]
    Failed(String),
}

#[derive(Clone, Debug)]
pub struct DeleteFlow {
    resource: &'static str,
    state: FlowState,
}

impl DeleteFlow {
    #[must_use]
    pub fn new(resource: &'static str) -> Self {
        Self { resource, state: FlowState::Idle }
    }

    #[must_use]
    pub fn state(&self) -> &FlowState {
        &self.state
    }

    /// Open the warning step for `target`.
    ///
    /// # Errors
    ///
    /// `OutOfOrder` unless the dialog is idle.
    pub fn handle_delete_click(&mut self, target: DeleteTarget) -> Result<(), FlowError> {
        if self.state != FlowState::Idle {
            return Err(self.out_of_order("handle_delete_click"));
        }
        self.state = FlowState::Warning(target);
        Ok(())
    }

    /// # Errors
    ///
    /// `OutOfOrder` unless the warning step is showing.
    pub fn proceed_to_confirm(&mut self) -> Result<(), FlowError> {
        let FlowState::Warning(target) = &self.state else {
            return Err(self.out_of_order("proceed_to_confirm"));
        };
        self.state = FlowState::Confirm(target.clone());
        Ok(())
    }

    /// Send the destructive request.
    ///
    /// # Errors
    ///
    /// `OutOfOrder` unless the confirm step is showing (nothing is sent);
    /// `Failed` with the alert text when the request fails.
    pub async fn execute_delete(&mut self, api: &ApiClient) -> Result<DeleteTarget, FlowError> {
        let FlowState::Confirm(target) = &self.state else {
            return Err(self.out_of_order("execute_delete"));
        };
        let target = target.clone();
        let path = target.action.path(self.resource, target.id);

        match api.send(target.action.method(), &path, RequestBody::Empty).await {
            Ok(_) => {
                tracing::info!(resource = self.resource, id = target.id, action = ?target.action, "destructive action applied");
                self.state = FlowState::Success(target.clone());
                Ok(target)
            }
            Err(error) => {
                self.state = FlowState::Idle;
                Err(FlowError::Failed(error.alert_message_or(target.action.failure_fallback())))
            }
        }
    }

    /// Dismiss the success step.
    ///
    /// # Errors
    ///
    /// `OutOfOrder` unless the success step is showing.
    pub fn close_success(&mut self) -> Result<(), FlowError> {
        if !matches!(self.state, FlowState::Success(_)) {
            return Err(self.out_of_order("close_success"));
        }
        self.state = FlowState::Idle;
        Ok(())
    }

    /// Close the dialog from the warning or confirm step.
    pub fn cancel(&mut self) {
        if matches!(self.state, FlowState::Warning(_) | FlowState::Confirm(_)) {
            self.state = FlowState::Idle;
        }
    }

    /// Text for the currently visible step, if any.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        let text = match &self.state {
            FlowState::Idle => return None,
            FlowState::Warning(t) => match t.action {
                DestructiveAction::Delete => format!("¿Deseas eliminar {}?", t.label),
                DestructiveAction::Toggle(_) => format!("¿Deseas cambiar el estado de {}?", t.label),
            },
            FlowState::Confirm(t) => match t.action {
                DestructiveAction::Delete => {
                    format!("Esta acción no se puede deshacer. Confirma la eliminación de {}.", t.label)
                }
                DestructiveAction::Toggle(_) => format!("Confirma el cambio de estado de {}.", t.label),
            },
            FlowState::Success(t) => match t.action {
                DestructiveAction::Delete => format!("{} eliminado correctamente.", t.label),
                DestructiveAction::Toggle(_) => format!("Estado de {} actualizado.", t.label),
            },
        };
        Some(text)
    }

    fn out_of_order(&self, attempted: &'static str) -> FlowError {
        FlowError::OutOfOrder { attempted, state: self.state.name() }
    }
}
