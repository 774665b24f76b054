//! Utility helpers shared across console pages.
//!
//! SYSTEM CONTEXT
//! ==============
//! Pure helpers with no network or storage access, so page logic stays
//! testable without a transport.

pub mod validation;
