//! Page state shared by every entity screen.
//!
//! SYSTEM CONTEXT
//! ==============
//! `data_source` owns cancellable async loads, `list_filter` and `table`
//! turn loaded rows into a render-ready grid, `delete_flow` is the
//! three-step destructive-action dialog and `lookups` drives the
//! company-dependent selects on create/edit forms.

pub mod data_source;
pub mod delete_flow;
pub mod list_filter;
pub mod lookups;
pub mod table;
