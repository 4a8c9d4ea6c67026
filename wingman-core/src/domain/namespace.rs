//! Storage key derivation
//!
//! Every per-user record lives under `{username}-wingman-{suffix}`. Without a
//! session the same records resolve to `anonymous-{suffix}`.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::Session;

/// Key holding the serialized [`UserRegistry`](super::UserRegistry)
pub const REGISTRY_KEY: &str = "wingman-user-registry";

/// Key holding the username of the last signed-in user
pub const CURRENT_USER_KEY: &str = "wingman-currentUser";

const ANONYMOUS_PREFIX: &str = "anonymous";

/// The kinds of record stored per user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntityKind {
    Profiles,
    Dates,
    Account,
    TutorialSeen,
}

impl EntityKind {
    pub const ALL: [EntityKind; 4] = [
        EntityKind::Profiles,
        EntityKind::Dates,
        EntityKind::Account,
        EntityKind::TutorialSeen,
    ];

    pub fn suffix(&self) -> &'static str {
        match self {
            EntityKind::Profiles => "profiles",
            EntityKind::Dates => "dates",
            EntityKind::Account => "account",
            EntityKind::TutorialSeen => "tutorial-seen",
        }
    }
}

/// A resolved key in the key-value store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    /// Key for a record owned by `username`
    pub fn for_user(username: &str, kind: EntityKind) -> Self {
        Self(format!("{}-wingman-{}", username, kind.suffix()))
    }

    /// Key for a record used while nobody is signed in
    pub fn anonymous(kind: EntityKind) -> Self {
        Self(format!("{}-{}", ANONYMOUS_PREFIX, kind.suffix()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolve where `kind` is stored for the given session
pub fn namespace_for(session: Option<&Session>, kind: EntityKind) -> StorageKey {
    match session {
        Some(s) => StorageKey::for_user(&s.username, kind),
        None => StorageKey::anonymous(kind),
    }
}
