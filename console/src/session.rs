//! Session token storage with "remember me" semantics.
//!
//! SYSTEM CONTEXT
//! ==============
//! Two key-value stores back the session: a persistent one (survives
//! restarts, used when the operator ticks "remember me") and a
//! session-scoped one. Exactly one is active at a time. On startup the
//! persistent store wins if it holds an access token or a user context.
//!
//! The session is an explicit handle injected into `ApiClient`; nothing
//! reads ambient global storage.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::{Deserialize, Serialize};

pub const ACCESS_KEY: &str = "tt_access";
pub const REFRESH_KEY: &str = "tt_refresh";
pub const CONTEXT_KEY: &str = "tt_context";
pub const FULL_NAME_KEY: &str = "tt_full_name";
pub const SESSION_KEYS: [&str; 4] = [ACCESS_KEY, REFRESH_KEY, CONTEXT_KEY, FULL_NAME_KEY];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("session store io failed: {0}")]
    Io(String),
    #[error("session store is corrupt: {0}")]
    Corrupt(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Persistent,
    SessionScoped,
}

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the backing medium rejects the write.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the backing medium rejects the write.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    fn kind(&self) -> StorageKind;
}

// =============================================================================
// STORES
// =============================================================================

/// Process-lifetime store.
pub struct MemoryStore {
    kind: StorageKind,
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(kind: StorageKind) -> Self {
        Self { kind, entries: Mutex::new(BTreeMap::new()) }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).remove(key);
        Ok(())
    }

    fn kind(&self) -> StorageKind {
        self.kind
    }
}

/// JSON-file store; the whole map is rewritten on every change.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    /// Open (or lazily create) the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the file exists but cannot be read, and
    /// [`StoreError::Corrupt`] if it is not a JSON string map.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| StoreError::Corrupt(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(StoreError::Io(e.to_string())),
        };
        Ok(Self { path, entries: Mutex::new(entries) })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::Io(e.to_string()))?;
        }
        let raw = serde_json::to_string_pretty(entries).map_err(|e| StoreError::Io(e.to_string()))?;
        std::fs::write(&self.path, raw).map_err(|e| StoreError::Io(e.to_string()))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_owned(), value.to_owned());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        if entries.remove(key).is_none() {
            return Ok(());
        }
        self.flush(&entries)
    }

    fn kind(&self) -> StorageKind {
        StorageKind::Persistent
    }
}

// =============================================================================
// SESSION
// =============================================================================

/// Server-provided context stored alongside the tokens.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    /// Route the console should open after login.
    pub redirect_to: String,
    #[serde(default)]
    pub rol: Option<String>,
    #[serde(default)]
    pub empresa_id: Option<i64>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionContext {
    pub access: Option<String>,
    pub refresh: Option<String>,
    pub context: Option<UserContext>,
    pub full_name: Option<String>,
}

/// The store startup should read from.
#[must_use]
pub fn select_store<'a>(
    persistent: &'a Arc<dyn KeyValueStore>,
    ephemeral: &'a Arc<dyn KeyValueStore>,
) -> &'a Arc<dyn KeyValueStore> {
    if persistent.get(ACCESS_KEY).is_some() || persistent.get(CONTEXT_KEY).is_some() {
        persistent
    } else {
        ephemeral
    }
}

/// Cheap-to-clone handle over the active session store.
#[derive(Clone)]
pub struct Session {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    persistent: Arc<dyn KeyValueStore>,
    ephemeral: Arc<dyn KeyValueStore>,
    state: RwLock<SessionState>,
}

struct SessionState {
    context: SessionContext,
    active: StorageKind,
}

impl Session {
    /// Restore whatever session the stores hold.
    #[must_use]
    pub fn load(persistent: Arc<dyn KeyValueStore>, ephemeral: Arc<dyn KeyValueStore>) -> Self {
        let store = select_store(&persistent, &ephemeral);
        let active = store.kind();
        let context = read_context(store.as_ref());
        tracing::debug!(?active, authenticated = context.access.is_some(), "session restored");
        Self {
            inner: Arc::new(SessionInner {
                persistent,
                ephemeral,
                state: RwLock::new(SessionState { context, active }),
            }),
        }
    }

    /// An empty session backed only by memory.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::load(
            Arc::new(MemoryStore::new(StorageKind::Persistent)),
            Arc::new(MemoryStore::new(StorageKind::SessionScoped)),
        )
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionContext {
        self.read(|state| state.context.clone())
    }

    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.read(|state| state.context.access.clone())
    }

    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.read(|state| state.context.refresh.clone())
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read(|state| state.context.access.is_some())
    }

    #[must_use]
    pub fn active_storage(&self) -> StorageKind {
        self.read(|state| state.active)
    }

    /// Store a fresh login, clearing the keys of the store not chosen.
    ///
    /// # Errors
    ///
    /// Returns the first store failure; in-memory state is updated anyway.
    pub fn establish(&self, context: SessionContext, remember: bool) -> Result<(), StoreError> {
        let (target, other) = if remember {
            (&self.inner.persistent, &self.inner.ephemeral)
        } else {
            (&self.inner.ephemeral, &self.inner.persistent)
        };
        let active = target.kind();
        self.write(|state| {
            state.context = context.clone();
            state.active = active;
        });

        clear_keys(other.as_ref())?;
        clear_keys(target.as_ref())?;
        write_context(target.as_ref(), &context)
    }

    /// Replace the access token after a refresh.
    ///
    /// # Errors
    ///
    /// Returns the store failure, if any.
    pub fn set_access(&self, token: &str) -> Result<(), StoreError> {
        self.write(|state| state.context.access = Some(token.to_owned()));
        self.active_store().set(ACCESS_KEY, token)
    }

    /// # Errors
    ///
    /// Returns the store failure, if any.
    pub fn set_full_name(&self, full_name: &str) -> Result<(), StoreError> {
        self.write(|state| state.context.full_name = Some(full_name.to_owned()));
        self.active_store().set(FULL_NAME_KEY, full_name)
    }

    /// Log out: drop every session key from both stores.
    ///
    /// # Errors
    ///
    /// Returns the first store failure.
    pub fn clear(&self) -> Result<(), StoreError> {
        self.write(|state| state.context = SessionContext::default());
        clear_keys(self.inner.persistent.as_ref())?;
        clear_keys(self.inner.ephemeral.as_ref())
    }

    fn active_store(&self) -> &dyn KeyValueStore {
        match self.active_storage() {
            StorageKind::Persistent => self.inner.persistent.as_ref(),
            StorageKind::SessionScoped => self.inner.ephemeral.as_ref(),
        }
    }

    fn read<R>(&self, f: impl FnOnce(&SessionState) -> R) -> R {
        let state = self.inner.state.read().unwrap_or_else(PoisonError::into_inner);
        f(&state)
    }

    fn write(&self, f: impl FnOnce(&mut SessionState)) {
        let mut state = self.inner.state.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut state);
    }
}

fn read_context(store: &dyn KeyValueStore) -> SessionContext {
    let context = store.get(CONTEXT_KEY).and_then(|raw| match serde_json::from_str(&raw) {
        Ok(context) => Some(context),
        Err(error) => {
            tracing::warn!(%error, "ignoring malformed stored user context");
            None
        }
    });
    SessionContext {
        access: store.get(ACCESS_KEY),
        refresh: store.get(REFRESH_KEY),
        context,
        full_name: store.get(FULL_NAME_KEY),
    }
}

fn write_context(store: &dyn KeyValueStore, context: &SessionContext) -> Result<(), StoreError> {
    if let Some(access) = &context.access {
        store.set(ACCESS_KEY, access)?;
    }
    if let Some(refresh) = &context.refresh {
        store.set(REFRESH_KEY, refresh)?;
    }
    if let Some(user) = &context.context {
        let raw = serde_json::to_string(user).map_err(|e| StoreError::Corrupt(e.to_string()))?;
        store.set(CONTEXT_KEY, &raw)?;
    }
    if let Some(full_name) = &context.full_name {
        store.set(FULL_NAME_KEY, full_name)?;
    }
    Ok(())
}

fn clear_keys(store: &dyn KeyValueStore) -> Result<(), StoreError> {
    for key in SESSION_KEYS {
        store.remove(key)?;
    }
    Ok(())
}
