//! In-memory store: the session scope. Contents die with the process.

use std::collections::HashMap;

use parking_lot::Mutex;

use super::KeyValueStore;
use crate::error::Result;

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.entries.lock().remove(key).is_some())
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.lock().keys().cloned().collect();
        keys.sort();
        keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("take-1"), None);

        store.set("take-1", "blob:abc").unwrap();
        assert_eq!(store.get("take-1").as_deref(), Some("blob:abc"));

        store.set("take-1", "blob:def").unwrap();
        assert_eq!(store.get("take-1").as_deref(), Some("blob:def"));

        assert!(store.remove("take-1").unwrap());
        assert!(!store.remove("take-1").unwrap());
        assert_eq!(store.get("take-1"), None);
    }

    #[test]
    fn empty_key_is_a_real_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get(""), None);
        store.set("", "blob:empty").unwrap();
        assert_eq!(store.get("").as_deref(), Some("blob:empty"));
    }

    #[test]
    fn keys_are_sorted() {
        let store = MemoryStore::new();
        store.set("b", "2").unwrap();
        store.set("a", "1").unwrap();
        assert_eq!(store.keys(), vec!["a", "b"]);
    }
}
