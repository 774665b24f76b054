//! Console configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Parsing goes through a lookup closure so tests can feed a map instead of
//! mutating the process environment. `from_env` is the production entry.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_FILTER_DEBOUNCE_MS: u64 = 300;
pub const FALLBACK_SESSION_FILE: &str = ".talenttrack-session.json";

/// Configuration failures that prevent the console from starting.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// The API base is not an absolute http(s) URL.
    #[error("invalid TALENTTRACK_API_BASE `{0}`: expected an http:// or https:// URL")]
    InvalidApiBase(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleConfig {
    /// Scheme + host (+ port) of the REST API, without a trailing slash.
    pub api_base: String,
    pub timeouts: Timeouts,
    /// Quiet period before a list filter change triggers a reload.
    pub filter_debounce: Duration,
    /// Location of the persistent ("remember me") session store.
    pub session_file: PathBuf,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_owned(),
            timeouts: Timeouts {
                request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
                connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
            },
            filter_debounce: Duration::from_millis(DEFAULT_FILTER_DEBOUNCE_MS),
            session_file: default_session_file(None),
        }
    }
}

impl ConsoleConfig {
    /// Build typed config from process environment variables.
    ///
    /// Optional:
    /// - `TALENTTRACK_API_BASE`: default `http://127.0.0.1:8000`
    /// - `TALENTTRACK_REQUEST_TIMEOUT_SECS`: default 30
    /// - `TALENTTRACK_CONNECT_TIMEOUT_SECS`: default 10
    /// - `TALENTTRACK_FILTER_DEBOUNCE_MS`: default 300
    /// - `TALENTTRACK_SESSION_FILE`: default `$HOME/.talenttrack/session.json`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiBase`] for a non-http(s) base URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build typed config from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiBase`] for a non-http(s) base URL.
    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_base = parse_api_base(lookup("TALENTTRACK_API_BASE").as_deref())?;
        let timeouts = Timeouts {
            request_secs: parse_u64(
                lookup("TALENTTRACK_REQUEST_TIMEOUT_SECS"),
                DEFAULT_REQUEST_TIMEOUT_SECS,
            ),
            connect_secs: parse_u64(
                lookup("TALENTTRACK_CONNECT_TIMEOUT_SECS"),
                DEFAULT_CONNECT_TIMEOUT_SECS,
            ),
        };
        let filter_debounce = Duration::from_millis(parse_u64(
            lookup("TALENTTRACK_FILTER_DEBOUNCE_MS"),
            DEFAULT_FILTER_DEBOUNCE_MS,
        ));
        let session_file = lookup("TALENTTRACK_SESSION_FILE")
            .filter(|value| !value.trim().is_empty())
            .map_or_else(
                || default_session_file(lookup("HOME").as_deref()),
                PathBuf::from,
            );

        Ok(Self { api_base, timeouts, filter_debounce, session_file })
    }

    /// Replace the API base, applying the same validation as `from_vars`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiBase`] for a non-http(s) base URL.
    pub fn with_api_base(mut self, raw: &str) -> Result<Self, ConfigError> {
        self.api_base = parse_api_base(Some(raw))?;
        Ok(self)
    }

    /// Join an API path onto the base. Absolute URLs pass through unchanged.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_owned();
        }
        if path.starts_with('/') {
            format!("{}{path}", self.api_base)
        } else {
            format!("{}/{path}", self.api_base)
        }
    }
}

fn parse_u64(raw: Option<String>, default: u64) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_api_base(raw: Option<&str>) -> Result<String, ConfigError> {
    let value = raw
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_API_BASE);
    if !(value.starts_with("http://") || value.starts_with("https://")) {
        return Err(ConfigError::InvalidApiBase(value.to_owned()));
    }
    Ok(value.trim_end_matches('/').to_owned())
}

fn default_session_file(home: Option<&str>) -> PathBuf {
    match home.filter(|home| !home.is_empty()) {
        Some(home) => PathBuf::from(home).join(".talenttrack").join("session.json"),
        None => PathBuf::from(FALLBACK_SESSION_FILE),
    }
}
