//! Key/value stores for recording URLs.
//!
//! Two scopes with different lifetimes: a persistent store that survives
//! restarts and a session store bound to one run. Keys that start with
//! `/` belong to the persistent scope, everything else to the session.

use serde::{Deserialize, Serialize};

use crate::error::Result;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

pub const PATH_SEPARATOR: char = '/';

/// Trait for key/value storage backends.
///
/// All methods take `&self`: backends manage their own locking.
/// The empty string is an ordinary key.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Returns true if the key was present.
    fn remove(&self, key: &str) -> Result<bool>;
    fn keys(&self) -> Vec<String>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageScope {
    Persistent,
    Session,
}

impl StorageScope {
    /// Scope a raw path belongs to: leading separator means persistent.
    pub fn of_path(path: &str) -> Self {
        if path.starts_with(PATH_SEPARATOR) {
            StorageScope::Persistent
        } else {
            StorageScope::Session
        }
    }
}

/// A store key tagged with the scope it lives in.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "scope", content = "key", rename_all = "lowercase")]
pub enum StorageKey {
    Persistent(String),
    Session(String),
}

impl StorageKey {
    pub fn from_path(path: &str) -> Self {
        match StorageScope::of_path(path) {
            StorageScope::Persistent => StorageKey::Persistent(path.to_string()),
            StorageScope::Session => StorageKey::Session(path.to_string()),
        }
    }

    pub fn scope(&self) -> StorageScope {
        match self {
            StorageKey::Persistent(_) => StorageScope::Persistent,
            StorageKey::Session(_) => StorageScope::Session,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            StorageKey::Persistent(k) | StorageKey::Session(k) => k,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leading_separator_selects_persistent() {
        assert_eq!(StorageScope::of_path("/recordings/a.wav"), StorageScope::Persistent);
        assert_eq!(StorageScope::of_path("/"), StorageScope::Persistent);
        assert_eq!(StorageScope::of_path("session-key"), StorageScope::Session);
        assert_eq!(StorageScope::of_path("a/b"), StorageScope::Session);
    }

    #[test]
    fn empty_path_is_session_scoped() {
        assert_eq!(StorageKey::from_path(""), StorageKey::Session(String::new()));
    }

    #[test]
    fn key_keeps_path_verbatim() {
        let key = StorageKey::from_path("/recordings/a.wav");
        assert_eq!(key.scope(), StorageScope::Persistent);
        assert_eq!(key.as_str(), "/recordings/a.wav");
    }

    #[test]
    fn key_serializes_with_scope_tag() {
        let key = StorageKey::Session("take-3".into());
        assert_eq!(
            serde_json::to_value(&key).unwrap(),
            serde_json::json!({"scope": "session", "key": "take-3"})
        );
    }
}
