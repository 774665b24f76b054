use super::*;
use std::collections::HashMap;

fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
        .collect()
}

#[test]
fn from_vars_uses_defaults_when_empty() {
    let env = vars(&[]);
    let cfg = ConsoleConfig::from_vars(|key| env.get(key).cloned()).unwrap();
    assert_eq!(cfg.api_base, DEFAULT_API_BASE);
    assert_eq!(
        cfg.timeouts,
        Timeouts {
            request_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS
        }
    );
    assert_eq!(cfg.filter_debounce, Duration::from_millis(300));
    assert_eq!(cfg.session_file, PathBuf::from(FALLBACK_SESSION_FILE));
}

#[test]
fn from_vars_parses_overrides() {
    let env = vars(&[
        ("TALENTTRACK_API_BASE", "https://rrhh.example.test/"),
        ("TALENTTRACK_REQUEST_TIMEOUT_SECS", "42"),
        ("TALENTTRACK_CONNECT_TIMEOUT_SECS", "7"),
        ("TALENTTRACK_FILTER_DEBOUNCE_MS", "150"),
        ("TALENTTRACK_SESSION_FILE", "/tmp/tt.json"),
    ]);
    let cfg = ConsoleConfig::from_vars(|key| env.get(key).cloned()).unwrap();
    assert_eq!(cfg.api_base, "https://rrhh.example.test");
    assert_eq!(cfg.timeouts, Timeouts { request_secs: 42, connect_secs: 7 });
    assert_eq!(cfg.filter_debounce, Duration::from_millis(150));
    assert_eq!(cfg.session_file, PathBuf::from("/tmp/tt.json"));
}

#[test]
fn from_vars_falls_back_on_malformed_numbers() {
    let env = vars(&[
        ("TALENTTRACK_REQUEST_TIMEOUT_SECS", "soon"),
        ("TALENTTRACK_FILTER_DEBOUNCE_MS", "-5"),
    ]);
    let cfg = ConsoleConfig::from_vars(|key| env.get(key).cloned()).unwrap();
    assert_eq!(cfg.timeouts.request_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    assert_eq!(cfg.filter_debounce, Duration::from_millis(DEFAULT_FILTER_DEBOUNCE_MS));
}

#[test]
fn from_vars_places_session_file_under_home() {
    let env = vars(&[("HOME", "/home/ana")]);
    let cfg = ConsoleConfig::from_vars(|key| env.get(key).cloned()).unwrap();
    assert_eq!(cfg.session_file, PathBuf::from("/home/ana/.talenttrack/session.json"));
}

#[test]
fn from_vars_rejects_non_http_base() {
    let env = vars(&[("TALENTTRACK_API_BASE", "ftp://files")]);
    let err = ConsoleConfig::from_vars(|key| env.get(key).cloned()).unwrap_err();
    assert_eq!(err, ConfigError::InvalidApiBase("ftp://files".to_owned()));
}

#[test]
fn endpoint_joins_relative_paths() {
    let cfg = ConsoleConfig::default();
    assert_eq!(cfg.endpoint("/api/kpis/"), "http://127.0.0.1:8000/api/kpis/");
    assert_eq!(cfg.endpoint("api/kpis/"), "http://127.0.0.1:8000/api/kpis/");
}

#[test]
fn endpoint_passes_absolute_urls_through() {
    let cfg = ConsoleConfig::default();
    assert_eq!(cfg.endpoint("https://other.test/x"), "https://other.test/x");
}

#[test]
fn with_api_base_trims_trailing_slash() {
    let cfg = ConsoleConfig::default().with_api_base("http://localhost:9000/").unwrap();
    assert_eq!(cfg.api_base, "http://localhost:9000");
}
