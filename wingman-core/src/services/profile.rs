//! Profile service - the people a user is getting to know

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::result::{Error, Result};
use crate::domain::{namespace_for, EntityKind, PersonProfile, ProfileDraft, Session};
use crate::ports::{KeyValueStore, KeyValueStoreExt};

/// Placeholder avatar for profiles saved without a picture
pub fn placeholder_avatar(id: &str) -> String {
    format!("https://picsum.photos/seed/{}/200", id)
}

/// CRUD over the profile list in the session's namespace
pub struct ProfileService {
    store: Arc<dyn KeyValueStore>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn list(&self, session: Option<&Session>) -> Result<Vec<PersonProfile>> {
        let key = namespace_for(session, EntityKind::Profiles);
        Ok(self.store.load_json(key.as_str())?.unwrap_or_default())
    }

    pub fn get(&self, session: Option<&Session>, id: &str) -> Result<PersonProfile> {
        self.list(session)?
            .into_iter()
            .find(|p| p.id == id)
            .ok_or_else(|| Error::not_found(format!("Profile '{}'", id)))
    }

    /// Save a new profile and return it with its assigned id
    pub fn add(&self, session: Option<&Session>, draft: ProfileDraft) -> Result<PersonProfile> {
        if draft.name.trim().is_empty() {
            return Err(Error::validation("Profile name is required"));
        }

        let id = Uuid::new_v4().to_string();
        let mut profile = draft.into_profile(id);
        if profile.avatar_url.trim().is_empty() {
            profile.avatar_url = placeholder_avatar(&profile.id);
        }

        let mut profiles = self.list(session)?;
        profiles.push(profile.clone());
        self.save(session, &profiles)?;
        Ok(profile)
    }

    /// Replace the stored profile that has the same id
    pub fn update(
        &self,
        session: Option<&Session>,
        profile: PersonProfile,
    ) -> Result<PersonProfile> {
        if profile.name.trim().is_empty() {
            return Err(Error::validation("Profile name is required"));
        }

        let mut profiles = self.list(session)?;
        let slot = profiles
            .iter_mut()
            .find(|p| p.id == profile.id)
            .ok_or_else(|| Error::not_found(format!("Profile '{}'", profile.id)))?;
        *slot = profile.clone();
        self.save(session, &profiles)?;
        Ok(profile)
    }

    /// Delete a profile; dates planned with them are kept
    pub fn remove(&self, session: Option<&Session>, id: &str) -> Result<PersonProfile> {
        let mut profiles = self.list(session)?;
        let index = profiles
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| Error::not_found(format!("Profile '{}'", id)))?;
        let removed = profiles.remove(index);
        self.save(session, &profiles)?;
        Ok(removed)
    }

    fn save(&self, session: Option<&Session>, profiles: &[PersonProfile]) -> Result<()> {
        let key = namespace_for(session, EntityKind::Profiles);
        self.store.save_json(key.as_str(), profiles)
    }
}
