//! # console
//!
//! Headless workflows for the TalentTrack super-admin console: session and
//! token storage, the bearer-authenticated API client, cancellable data
//! sources, dependent company lookups, the three-step destructive-action
//! dialog, and one list/create/edit page model per managed entity.
//!
//! Rendering is left to the embedding front end (the `talenttrack` CLI in
//! this workspace); every page exposes render-ready table and form state.

pub mod config;
pub mod net;
pub mod pages;
pub mod session;
pub mod state;
pub mod util;
