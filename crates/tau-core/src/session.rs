//! Record session: resolves recording paths to stored URLs.
//!
//! Holds both storage scopes plus the state that outlives single calls:
//! the last URL path used (so callers may omit it) and an instance counter.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::Result;
use crate::storage::{FileStore, KeyValueStore, MemoryStore, StorageKey, StorageScope};

pub struct RecordSession {
    persistent: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
    last_url: Mutex<String>,
    instance_number: AtomicU32,
}

impl RecordSession {
    /// File-backed persistent scope under `config`, fresh in-memory session.
    pub fn open(config: &Config) -> Result<Self> {
        let persistent = FileStore::in_dir(config.app_dir())?;
        Ok(Self::with_stores(
            Arc::new(persistent),
            Arc::new(MemoryStore::new()),
        ))
    }

    pub fn with_stores(persistent: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self {
            persistent,
            session,
            last_url: Mutex::new(String::new()),
            instance_number: AtomicU32::new(0),
        }
    }

    /// Both scopes in memory. Nothing touches disk.
    pub fn in_memory() -> Self {
        Self::with_stores(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    fn store(&self, scope: StorageScope) -> &dyn KeyValueStore {
        match scope {
            StorageScope::Persistent => &*self.persistent,
            StorageScope::Session => &*self.session,
        }
    }

    /// `None` or `""` means the last URL path.
    fn effective_key(&self, path: Option<&str>) -> StorageKey {
        match path {
            Some(p) if !p.is_empty() => StorageKey::from_path(p),
            _ => StorageKey::from_path(&self.last_url.lock()),
        }
    }

    // -----------------------------------------------------------------------
    // Lookup
    // -----------------------------------------------------------------------

    /// URL stored for `path`, or for the last URL path when `path` is
    /// absent or empty. A missing key yields `None`.
    pub fn get_record_url(&self, path: Option<&str>) -> Option<String> {
        let key = self.effective_key(path);
        let url = self.get(&key);
        log::debug!("tau: record url {:?} -> {:?}", key, url);
        url
    }

    pub fn get(&self, key: &StorageKey) -> Option<String> {
        self.store(key.scope()).get(key.as_str())
    }

    // -----------------------------------------------------------------------
    // Mutation
    // -----------------------------------------------------------------------

    /// Store `url` under `path` and make `path` the last URL path.
    pub fn save_record_url(&self, path: &str, url: &str) -> Result<()> {
        let key = StorageKey::from_path(path);
        self.store(key.scope()).set(key.as_str(), url)?;
        self.set_last_url(path);
        Ok(())
    }

    /// Remove the entry `get_record_url` would read. Returns true if it existed.
    pub fn delete_record(&self, path: Option<&str>) -> Result<bool> {
        let key = self.effective_key(path);
        let removed = self.store(key.scope()).remove(key.as_str())?;
        if !removed {
            log::warn!("tau: no record at {:?}", key);
        }
        Ok(removed)
    }

    // -----------------------------------------------------------------------
    // Session state
    // -----------------------------------------------------------------------

    pub fn last_url(&self) -> String {
        self.last_url.lock().clone()
    }

    pub fn set_last_url(&self, path: &str) {
        *self.last_url.lock() = path.to_string();
    }

    pub fn instance_number(&self) -> u32 {
        self.instance_number.load(Ordering::SeqCst)
    }

    /// Increment the instance counter and return the new value.
    pub fn next_instance(&self) -> u32 {
        self.instance_number.fetch_add(1, Ordering::SeqCst) + 1
    }
}
