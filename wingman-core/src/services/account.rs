//! Account service - registration, login and session lifecycle
//!
//! The registry and the current-user pointer both live in the injected
//! key-value store. Sessions survive process restarts through the pointer.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::domain::auth::{normalize_username, UserAuthRecord, UserRegistry};
use crate::domain::namespace::{CURRENT_USER_KEY, REGISTRY_KEY};
use crate::domain::result::{Error, Result};
use crate::domain::{namespace_for, EntityKind, Session, StorageKey};
use crate::ports::{KeyValueStore, KeyValueStoreExt};
use crate::services::TutorialService;

/// Service for the local account registry
pub struct AccountService {
    store: Arc<dyn KeyValueStore>,
    tutorial: TutorialService,
    delay: Duration,
}

impl AccountService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            tutorial: TutorialService::new(Arc::clone(&store)),
            store,
            delay: Duration::ZERO,
        }
    }

    /// Pause before checking credentials (cosmetic; zero by default)
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Create a new account and sign it in
    pub fn register(&self, username: &str, password: &str) -> Result<Session> {
        let username = Self::check_input(username, password)?;
        self.pause();

        let mut registry = self.registry()?;
        if registry.contains(&username) {
            return Err(Error::DuplicateUsername(username));
        }

        registry.insert(username.clone(), UserAuthRecord::create(password));
        self.save_registry(&registry)?;

        let session = Session::new_user(username);
        self.set_current_user(Some(&session.username))?;
        self.tutorial.initialize(&session)?;
        Ok(session)
    }

    /// Sign in to an existing account
    pub fn login(&self, username: &str, password: &str) -> Result<Session> {
        let username = Self::check_input(username, password)?;
        self.pause();

        let registry = self.registry()?;
        let record = registry
            .get(&username)
            .ok_or_else(|| Error::UserNotFound(username.clone()))?;
        if !record.verify(password) {
            return Err(Error::InvalidCredentials);
        }

        let session = Session::returning(username);
        self.set_current_user(Some(&session.username))?;
        self.tutorial.initialize(&session)?;
        Ok(session)
    }

    /// Sign out; the account itself is untouched
    pub fn logout(&self, _session: &Session) -> Result<()> {
        self.set_current_user(None)
    }

    /// Remove the account and everything stored for it, then sign out
    pub fn delete_account(&self, session: &Session) -> Result<()> {
        let mut registry = self.registry()?;
        if registry.remove(&session.username).is_some() {
            self.save_registry(&registry)?;
        }

        for kind in EntityKind::ALL {
            self.store
                .remove(StorageKey::for_user(&session.username, kind).as_str())?;
        }

        self.logout(session)
    }

    /// Restore the session left by the last login, if that user still exists
    pub fn current_session(&self) -> Result<Option<Session>> {
        let username: Option<String> = self.store.load_json(CURRENT_USER_KEY)?;
        let Some(username) = username else {
            return Ok(None);
        };

        if self.registry()?.contains(&username) {
            Ok(Some(Session::returning(username)))
        } else {
            Ok(None)
        }
    }

    /// Where `kind` lives for the given (possibly absent) session
    pub fn namespace_for(&self, session: Option<&Session>, kind: EntityKind) -> StorageKey {
        namespace_for(session, kind)
    }

    /// Registered usernames, sorted
    pub fn usernames(&self) -> Result<Vec<String>> {
        Ok(self.registry()?.usernames().map(str::to_string).collect())
    }

    fn check_input(username: &str, password: &str) -> Result<String> {
        let username = normalize_username(username);
        if username.is_empty() || password.is_empty() {
            return Err(Error::EmptyInput);
        }
        Ok(username)
    }

    fn pause(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }

    fn registry(&self) -> Result<UserRegistry> {
        Ok(self.store.load_json(REGISTRY_KEY)?.unwrap_or_default())
    }

    fn save_registry(&self, registry: &UserRegistry) -> Result<()> {
        self.store.save_json(REGISTRY_KEY, registry)
    }

    fn set_current_user(&self, username: Option<&str>) -> Result<()> {
        match username {
            Some(name) => self.store.save_json(CURRENT_USER_KEY, name),
            None => self.store.remove(CURRENT_USER_KEY),
        }
    }
}
