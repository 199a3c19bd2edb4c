//! Persisted client state: a small string key-value store and the two fixed
//! slots kept in it (the last analysis result and the identity tag).

use once_cell::sync::OnceCell;
use serde_json::Value;
use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, MutexGuard},
};
use tracing::{error, warn};

pub const RESULT_KEY: &str = "analysisResult";
pub const IDENTITY_KEY: &str = "user";
pub const DEFAULT_IDENTITY: &str = "demo-user";

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: String) -> io::Result<()>;
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// Store kept as one JSON object on disk. The file is read on first access
/// and every write goes straight back to it; a write that fails to reach
/// disk leaves the previous contents in place.
pub struct JsonFileStore {
    path: PathBuf,
    entries: OnceCell<Mutex<BTreeMap<String, String>>>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: OnceCell::new(),
        }
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        let cell = self
            .entries
            .get_or_init(|| Mutex::new(load_entries(&self.path)));
        cell.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let payload = serde_json::to_vec_pretty(entries).map_err(io::Error::other)?;
        fs::write(&self.path, payload)
    }
}

fn load_entries(path: &Path) -> BTreeMap<String, String> {
    match fs::read(path) {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(entries) => entries,
            Err(err) => {
                error!("failed to parse state file {}: {err}", path.display());
                BTreeMap::new()
            }
        },
        Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
        Err(err) => {
            error!("failed to read state file {}: {err}", path.display());
            BTreeMap::new()
        }
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> io::Result<()> {
        let mut entries = self.entries();
        let mut updated = entries.clone();
        updated.insert(key.to_string(), value);
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        let mut entries = self.entries();
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut updated = entries.clone();
        updated.remove(key);
        self.persist(&updated)?;
        *entries = updated;
        Ok(())
    }
}

/// Runs a store write on tokio's blocking pool. [`JsonFileStore`] writes the
/// whole file synchronously, so async callers go through here rather than
/// blocking a worker thread. Reads are served from memory once loaded.
pub async fn off_thread<T, F>(write: F) -> io::Result<T>
where
    F: FnOnce() -> io::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(write)
        .await
        .map_err(io::Error::other)?
}

/// Volatile store, mostly for tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries().get(key).cloned()
    }

    fn set(&self, key: &str, value: String) -> io::Result<()> {
        self.entries().insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> io::Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}

/// The single last-write-wins slot holding the most recent analysis result.
#[derive(Clone)]
pub struct ResultCache {
    store: Arc<dyn KeyValueStore>,
}

impl ResultCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn put(&self, result: &Value) -> io::Result<()> {
        let text = serde_json::to_string(result).map_err(io::Error::other)?;
        self.store.set(RESULT_KEY, text)
    }

    /// Missing and unreadable entries both come back as `None`.
    pub fn get(&self) -> Option<Value> {
        let text = self.store.get(RESULT_KEY)?;
        match serde_json::from_str(&text) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("discarding unreadable cached result: {err}");
                None
            }
        }
    }

    pub fn clear(&self) -> io::Result<()> {
        self.store.remove(RESULT_KEY)
    }
}

/// The correlation tag sent with every webhook request.
#[derive(Clone)]
pub struct IdentityStore {
    store: Arc<dyn KeyValueStore>,
}

impl IdentityStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn get(&self) -> Option<String> {
        self.store.get(IDENTITY_KEY).filter(|tag| !tag.trim().is_empty())
    }

    /// Tag to put on outgoing requests; falls back to [`DEFAULT_IDENTITY`].
    pub fn current(&self) -> String {
        self.get().unwrap_or_else(|| DEFAULT_IDENTITY.to_string())
    }

    pub fn set(&self, tag: &str) -> io::Result<()> {
        self.store.set(IDENTITY_KEY, tag.trim().to_string())
    }

    pub fn clear(&self) -> io::Result<()> {
        self.store.remove(IDENTITY_KEY)
    }
}
