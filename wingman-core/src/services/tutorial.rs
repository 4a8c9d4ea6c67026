//! Tutorial service - first-run walkthrough visibility

use std::sync::Arc;

use crate::domain::result::Result;
use crate::domain::{EntityKind, Session, StorageKey};
use crate::ports::{KeyValueStore, KeyValueStoreExt};

/// Tracks whether a user has been through the walkthrough
pub struct TutorialService {
    store: Arc<dyn KeyValueStore>,
}

impl TutorialService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key(session: &Session) -> StorageKey {
        StorageKey::for_user(&session.username, EntityKind::TutorialSeen)
    }

    /// Set the flag for a fresh session
    ///
    /// New users start unseen. Returning users are only marked seen when no
    /// flag exists yet, so an unfinished tutorial keeps showing.
    pub fn initialize(&self, session: &Session) -> Result<()> {
        let key = Self::key(session);
        if session.is_new_user {
            self.store.save_json(key.as_str(), &false)
        } else if self.store.get(key.as_str())?.is_none() {
            self.store.save_json(key.as_str(), &true)
        } else {
            Ok(())
        }
    }

    pub fn has_seen(&self, session: &Session) -> Result<bool> {
        Ok(self
            .store
            .load_json::<bool>(Self::key(session).as_str())?
            .unwrap_or(false))
    }

    /// Whether the walkthrough should be shown
    pub fn should_show(&self, session: &Session) -> Result<bool> {
        Ok(!self.has_seen(session)?)
    }

    pub fn complete(&self, session: &Session) -> Result<()> {
        self.store.save_json(Self::key(session).as_str(), &true)
    }

    /// Show the walkthrough again on next use
    pub fn replay(&self, session: &Session) -> Result<()> {
        self.store.save_json(Self::key(session).as_str(), &false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::InMemoryStore;

    #[test]
    fn test_new_user_starts_unseen() {
        let service = TutorialService::new(Arc::new(InMemoryStore::new()));
        let session = Session::new_user("alice");
        service.initialize(&session).unwrap();
        assert!(service.should_show(&session).unwrap());
    }

    #[test]
    fn test_returning_user_without_flag_is_marked_seen() {
        let service = TutorialService::new(Arc::new(InMemoryStore::new()));
        let session = Session::returning("alice");
        assert!(!service.has_seen(&session).unwrap());

        service.initialize(&session).unwrap();
        assert!(service.has_seen(&session).unwrap());
    }

    #[test]
    fn test_complete_and_replay() {
        let store = Arc::new(InMemoryStore::new());
        let service = TutorialService::new(store.clone());
        let session = Session::new_user("alice");
        service.initialize(&session).unwrap();

        service.complete(&session).unwrap();
        assert!(service.has_seen(&session).unwrap());

        // A later login must not reset a completed tutorial
        service.initialize(&Session::returning("alice")).unwrap();
        assert!(service.has_seen(&session).unwrap());

        service.replay(&session).unwrap();
        assert!(!service.has_seen(&session).unwrap());
        assert_eq!(store.keys().unwrap(), vec!["alice-wingman-tutorial-seen".to_string()]);
    }
}
