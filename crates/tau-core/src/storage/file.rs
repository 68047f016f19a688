//! File-backed store: the persistent scope.
//!
//! The whole map is one JSON object on disk. Every operation re-reads the
//! file under the lock and every mutation rewrites it, so stores opened
//! on the same path see each other's writes and a crash loses at most the
//! write in flight.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use super::KeyValueStore;
use crate::error::Result;

pub const STORE_FILE: &str = "local_storage.json";

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    /// Last contents read from or written to disk.
    entries: Mutex<BTreeMap<String, String>>,
}

/// A missing or empty file is an empty map.
fn load(path: &Path) -> Result<BTreeMap<String, String>> {
    if !path.exists() {
        return Ok(BTreeMap::new());
    }
    let bytes = fs::read(path)?;
    if bytes.is_empty() {
        return Ok(BTreeMap::new());
    }
    Ok(serde_json::from_slice(&bytes)?)
}

impl FileStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let entries = load(&path)?;
        log::debug!("tau: opened {} ({} entries)", path.display(), entries.len());
        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    /// Open `STORE_FILE` inside `dir`, creating the directory.
    pub fn in_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        Self::open(dir.join(STORE_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file for a lookup. On failure the last good contents
    /// are kept and the error is logged.
    fn refresh(&self, entries: &mut BTreeMap<String, String>) {
        match load(&self.path) {
            Ok(fresh) => *entries = fresh,
            Err(e) => log::warn!("tau: reload {} failed: {}", self.path.display(), e),
        }
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(entries)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock();
        self.refresh(&mut entries);
        entries.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.lock();
        *entries = load(&self.path)?;
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    fn remove(&self, key: &str) -> Result<bool> {
        let mut entries = self.entries.lock();
        *entries = load(&self.path)?;
        if entries.remove(key).is_none() {
            return Ok(false);
        }
        self.flush(&entries)?;
        Ok(true)
    }

    fn keys(&self) -> Vec<String> {
        let mut entries = self.entries.lock();
        self.refresh(&mut entries);
        entries.keys().cloned().collect()
    }
}
