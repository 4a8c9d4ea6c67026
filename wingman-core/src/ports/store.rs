//! Key-value store port - persistence abstraction
//!
//! Everything Wing Man persists is JSON text under a string key. The store
//! assumes a single writer; it makes no attempt to merge concurrent updates.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::result::Result;

/// Durable string-to-string storage
///
/// Implementations must make each `set`/`remove` atomic for its key.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`; deleting an absent key is not an error
    fn remove(&self, key: &str) -> Result<()>;

    /// All keys currently stored, in ascending order
    fn keys(&self) -> Result<Vec<String>>;
}

/// Typed JSON access on top of any [`KeyValueStore`]
pub trait KeyValueStoreExt {
    /// Read and deserialize the value under `key`
    ///
    /// A stored JSON `null` reads the same as an absent key.
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>;

    /// Serialize and store `value` under `key`
    fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStoreExt for S {
    fn load_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key)? {
            Some(raw) => {
                let value: serde_json::Value = serde_json::from_str(&raw)?;
                if value.is_null() {
                    return Ok(None);
                }
                Ok(Some(serde_json::from_value(value)?))
            }
            None => Ok(None),
        }
    }

    fn save_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.set(key, &raw)
    }
}
