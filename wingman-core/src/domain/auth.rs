//! Account registry domain models
//!
//! The registry is a single JSON object mapping normalized usernames to their
//! salt and password digest:
//! ```json
//! { "alice": { "passwordHash": "9f86d0...", "salt": "3b1c..." } }
//! ```

use std::collections::BTreeMap;

use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Number of random bytes in a freshly generated salt
pub const SALT_LEN: usize = 16;

/// Salt and digest stored for one registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAuthRecord {
    pub password_hash: String,
    pub salt: String,
}

impl UserAuthRecord {
    /// Create a record for a new user with a fresh salt
    pub fn create(password: &str) -> Self {
        let salt = generate_salt();
        let password_hash = hash_password(password, &salt);
        Self {
            password_hash,
            salt,
        }
    }

    /// Check a password attempt against the stored digest
    pub fn verify(&self, password: &str) -> bool {
        hash_password(password, &self.salt) == self.password_hash
    }
}

/// Mapping from normalized username to auth record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserRegistry {
    users: BTreeMap<String, UserAuthRecord>,
}

impl UserRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, username: &str) -> Option<&UserAuthRecord> {
        self.users.get(username)
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    /// Insert a record, returning the previous one if the username was taken
    pub fn insert(&mut self, username: String, record: UserAuthRecord) -> Option<UserAuthRecord> {
        self.users.insert(username, record)
    }

    pub fn remove(&mut self, username: &str) -> Option<UserAuthRecord> {
        self.users.remove(username)
    }

    pub fn usernames(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

/// The currently authenticated user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    /// True only for the session handed out by registration
    pub is_new_user: bool,
}

impl Session {
    pub fn new_user(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_new_user: true,
        }
    }

    pub fn returning(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            is_new_user: false,
        }
    }
}

/// Trim and lower-case a username
pub fn normalize_username(username: &str) -> String {
    username.trim().to_lowercase()
}

/// Generate a random hex-encoded salt
pub fn generate_salt() -> String {
    let mut bytes = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// SHA-256 of `password || salt` as lowercase hex
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password_known_vector() {
        // sha256("secret1" + "salt")
        let expected = hex::encode(Sha256::digest(b"secret1salt"));
        assert_eq!(hash_password("secret1", "salt"), expected);
        assert_eq!(expected.len(), 64);
        assert!(expected.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_salt_is_fresh() {
        let a = generate_salt();
        let b = generate_salt();
        assert_eq!(a.len(), SALT_LEN * 2);
        assert_ne!(a, b);
    }

    #[test]
    fn test_record_verify() {
        let record = UserAuthRecord::create("hunter2");
        assert!(record.verify("hunter2"));
        assert!(!record.verify("hunter3"));
        assert!(!record.verify(""));
    }

    #[test]
    fn test_normalize_username() {
        assert_eq!(normalize_username("  Alice "), "alice");
        assert_eq!(normalize_username("BOB"), "bob");
        assert_eq!(normalize_username("   "), "");
    }

    #[test]
    fn test_registry_json_shape() {
        let mut registry = UserRegistry::new();
        registry.insert(
            "alice".to_string(),
            UserAuthRecord {
                password_hash: "abc".to_string(),
                salt: "xyz".to_string(),
            },
        );

        let json = serde_json::to_value(&registry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"alice": {"passwordHash": "abc", "salt": "xyz"}})
        );

        let parsed: UserRegistry = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, registry);
    }
}
