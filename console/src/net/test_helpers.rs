//! In-memory transport and client builders shared by unit tests.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde_json::Value;

use super::api::ApiClient;
use super::transport::{ApiRequest, ApiResponse, Method, Transport, TransportError};
use crate::config::ConsoleConfig;
use crate::session::{Session, SessionContext};

pub const TEST_BASE: &str = "http://api.test";

struct Stub {
    method: Method,
    path: String,
    reply: Result<ApiResponse, TransportError>,
    delay: Duration,
    once: bool,
}

/// Scripted transport: replies are matched on method + path (with query).
/// `once` stubs are consumed on first match; unmatched requests get a 404.
#[derive(Default)]
pub struct FakeTransport {
    stubs: Mutex<Vec<Stub>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn on(&self, method: Method, path: &str, status: u16, body: Value) {
        self.push(method, path, Ok(ApiResponse::new(status, body.to_string())), Duration::ZERO, false);
    }

    pub fn on_once(&self, method: Method, path: &str, status: u16, body: Value) {
        self.push(method, path, Ok(ApiResponse::new(status, body.to_string())), Duration::ZERO, true);
    }

    pub fn on_delayed(&self, method: Method, path: &str, body: Value, delay: Duration) {
        self.push(method, path, Ok(ApiResponse::new(200, body.to_string())), delay, false);
    }

    pub fn fail(&self, method: Method, path: &str) {
        let reply = Err(TransportError::Request("connection refused".to_owned()));
        self.push(method, path, reply, Duration::ZERO, false);
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        let url = format!("{TEST_BASE}{path}");
        self.requests()
            .iter()
            .filter(|request| request.method == method && request.url == url)
            .count()
    }

    fn push(&self, method: Method, path: &str, reply: Result<ApiResponse, TransportError>, delay: Duration, once: bool) {
        self.stubs
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Stub { method, path: path.to_owned(), reply, delay, once });
    }
}

#[async_trait::async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let path = request.url.strip_prefix(TEST_BASE).unwrap_or(&request.url).to_owned();
        let method = request.method;
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(request);

        let matched = {
            let mut stubs = self.stubs.lock().unwrap_or_else(PoisonError::into_inner);
            let index = stubs.iter().position(|stub| stub.method == method && stub.path == path);
            index.map(|index| {
                if stubs[index].once {
                    let stub = stubs.remove(index);
                    (stub.reply, stub.delay)
                } else {
                    (stubs[index].reply.clone(), stubs[index].delay)
                }
            })
        };

        match matched {
            Some((reply, delay)) => {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                reply
            }
            None => Ok(ApiResponse::new(404, r#"{"detail":"No encontrado."}"#)),
        }
    }
}

pub fn test_config() -> ConsoleConfig {
    ConsoleConfig { api_base: TEST_BASE.to_owned(), ..ConsoleConfig::default() }
}

/// Client with a signed-in, session-scoped session (`tok-1` / `ref-1`).
pub fn authed_client(transport: &Arc<FakeTransport>) -> ApiClient {
    let session = Session::in_memory();
    session
        .establish(
            SessionContext {
                access: Some("tok-1".to_owned()),
                refresh: Some("ref-1".to_owned()),
                context: None,
                full_name: None,
            },
            false,
        )
        .unwrap();
    ApiClient::new(test_config(), transport.clone(), session)
}

pub fn anonymous_client(transport: &Arc<FakeTransport>) -> ApiClient {
    ApiClient::new(test_config(), transport.clone(), Session::in_memory())
}
