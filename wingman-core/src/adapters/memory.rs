//! In-memory key-value store
//!
//! Used by tests and by callers that want a throwaway session.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::domain::result::{Error, Result};
use crate::ports::KeyValueStore;

/// Key-value store backed by a map in process memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with entries
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries
            .lock()
            .map_err(|e| Error::storage(format!("Lock poisoned: {}", e)))
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.lock()?.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::KeyValueStoreExt;

    #[test]
    fn test_set_get_remove() {
        let store = InMemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("a", "1").unwrap();
        assert_eq!(store.get("a").unwrap(), Some("1".to_string()));

        store.set("a", "2").unwrap();
        assert_eq!(store.get("a").unwrap(), Some("2".to_string()));

        store.remove("a").unwrap();
        assert_eq!(store.get("a").unwrap(), None);

        // Removing again is fine
        store.remove("a").unwrap();
    }

    #[test]
    fn test_keys_sorted() {
        let store = InMemoryStore::with_entries([("b", "1"), ("a", "2")]);
        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_json_helpers() {
        let store = InMemoryStore::new();
        store.save_json("flag", &true).unwrap();
        assert_eq!(store.get("flag").unwrap(), Some("true".to_string()));
        assert_eq!(store.load_json::<bool>("flag").unwrap(), Some(true));

        store.set("user", "null").unwrap();
        assert_eq!(store.load_json::<String>("user").unwrap(), None);

        store.set("broken", "{not json").unwrap();
        assert!(store.load_json::<bool>("broken").is_err());
    }
}
