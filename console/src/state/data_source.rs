//! Cancellable, debounced async list loading.
//!
//! DESIGN
//! ======
//! Each load takes a generation ticket. Starting a new load bumps the
//! generation and aborts the previous task, so a slow response for an old
//! query can never overwrite newer results: a task only commits when its
//! ticket still matches. Debounced loads sleep inside the spawned task;
//! a newer change aborts the sleeper, which is what collapses bursts of
//! keystrokes into one request.
//!
//! The shared state sits behind a std mutex that is never held across an
//! await point.
//!
//! Loads are spawned on the ambient tokio runtime.

#[cfg(test)]
#[path = "data_source_test.rs"]
mod data_source_test;

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::task::{AbortHandle, JoinHandle};

use crate::net::error::ApiError;

/// Lifecycle of one data source.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadState<T> {
    Idle,
    Loading,
    Ready(Vec<T>),
    /// Alert text of the last failed load.
    Failed(String),
}

impl<T> LoadState<T> {
    #[must_use]
    pub fn items(&self) -> &[T] {
        match self {
            Self::Ready(items) => items,
            _ => &[],
        }
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

type Fetcher<Q, T> = Arc<dyn Fn(Q) -> BoxFuture<'static, Result<Vec<T>, ApiError>> + Send + Sync>;

struct Shared<Q, T> {
    query: Q,
    state: LoadState<T>,
    generation: u64,
    in_flight: Option<AbortHandle>,
}

pub struct DataSource<Q, T> {
    fetch: Fetcher<Q, T>,
    shared: Arc<Mutex<Shared<Q, T>>>,
}

impl<Q, T> Clone for DataSource<Q, T> {
    fn clone(&self) -> Self {
        Self { fetch: Arc::clone(&self.fetch), shared: Arc::clone(&self.shared) }
    }
}

impl<Q, T> DataSource<Q, T>
where
    Q: Clone + Send + 'static,
    T: Clone + Send + 'static,
{
    /// Create an idle source; nothing is fetched until `refresh`/`set_query`.
    pub fn new<F, Fut>(query: Q, fetch: F) -> Self
    where
        F: Fn(Q) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Vec<T>, ApiError>> + Send + 'static,
    {
        let fetch: Fetcher<Q, T> =
            Arc::new(move |query: Q| -> BoxFuture<'static, Result<Vec<T>, ApiError>> { Box::pin(fetch(query)) });
        Self {
            fetch,
            shared: Arc::new(Mutex::new(Shared { query, state: LoadState::Idle, generation: 0, in_flight: None })),
        }
    }

    #[must_use]
    pub fn query(&self) -> Q {
        self.lock().query.clone()
    }

    #[must_use]
    pub fn state(&self) -> LoadState<T> {
        self.lock().state.clone()
    }

    #[must_use]
    pub fn items(&self) -> Vec<T> {
        self.lock().state.items().to_vec()
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    /// Reload the current query immediately.
    pub fn refresh(&self) -> JoinHandle<()> {
        self.spawn_load(None)
    }

    /// Replace the query and reload immediately.
    pub fn set_query(&self, query: Q) -> JoinHandle<()> {
        self.lock().query = query;
        self.spawn_load(None)
    }

    /// Edit the query in place and reload once `delay` passes without
    /// another change.
    pub fn update_query_debounced(&self, delay: Duration, edit: impl FnOnce(&mut Q)) -> JoinHandle<()> {
        edit(&mut self.lock().query);
        self.spawn_load(Some(delay))
    }

    /// Cancel any in-flight load and return to `Idle`.
    pub fn clear(&self) {
        let mut shared = self.lock();
        shared.generation += 1;
        if let Some(handle) = shared.in_flight.take() {
            handle.abort();
        }
        shared.state = LoadState::Idle;
    }

    fn spawn_load(&self, delay: Option<Duration>) -> JoinHandle<()> {
        let mut shared = self.lock();
        shared.generation += 1;
        let ticket = shared.generation;
        if let Some(previous) = shared.in_flight.take() {
            previous.abort();
        }
        if delay.is_none() {
            shared.state = LoadState::Loading;
        }

        let fetch = Arc::clone(&self.fetch);
        let state = Arc::clone(&self.shared);
        let handle = tokio::spawn(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            let query = {
                let mut shared = lock(&state);
                if shared.generation != ticket {
                    return;
                }
                shared.state = LoadState::Loading;
                shared.query.clone()
            };

            let result = fetch(query).await;

            let mut shared = lock(&state);
            if shared.generation != ticket {
                tracing::debug!(ticket, current = shared.generation, "discarding stale load");
                return;
            }
            shared.in_flight = None;
            shared.state = match result {
                Ok(items) => LoadState::Ready(items),
                Err(error) => {
                    tracing::warn!(%error, "load failed");
                    LoadState::Failed(error.alert_message_or("No se pudieron cargar los registros."))
                }
            };
        });
        shared.in_flight = Some(handle.abort_handle());
        handle
    }

    fn lock(&self) -> MutexGuard<'_, Shared<Q, T>> {
        lock(&self.shared)
    }
}

fn lock<Q, T>(shared: &Mutex<Shared<Q, T>>) -> MutexGuard<'_, Shared<Q, T>> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Wait for a load task; aborted (superseded) tasks count as settled.
pub async fn settle(handle: JoinHandle<()>) {
    if let Err(error) = handle.await {
        if error.is_panic() {
            tracing::error!(%error, "load task panicked");
        }
    }
}
