//! Networking for the TalentTrack REST API.
//!
//! SYSTEM CONTEXT
//! ==============
//! `transport` is the HTTP seam, `api` the bearer-authenticated client built
//! on it, `auth` the login/logout workflows, `error` the shared failure
//! taxonomy and `types` the wire schema.

pub mod api;
pub mod auth;
pub mod error;
pub mod transport;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
