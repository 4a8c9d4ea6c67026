//! Settings service - the signed-in user's own display settings

use std::sync::Arc;

use base64::Engine;

use crate::domain::result::{Error, Result};
use crate::domain::{EntityKind, Session, StorageKey, UserAccount};
use crate::ports::{KeyValueStore, KeyValueStoreExt};

/// Largest inline (data URL) avatar accepted, in bytes of decoded image
pub const MAX_AVATAR_BYTES: usize = 800 * 1024;

pub struct SettingsService {
    store: Arc<dyn KeyValueStore>,
}

impl SettingsService {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn key(session: &Session) -> StorageKey {
        StorageKey::for_user(&session.username, EntityKind::Account)
    }

    /// Stored settings, or defaults when nothing was saved yet
    pub fn load(&self, session: &Session) -> Result<UserAccount> {
        let stored: Option<UserAccount> = self.store.load_json(Self::key(session).as_str())?;
        let mut account = match stored {
            Some(account) => account,
            None => return Ok(UserAccount::default_for(&session.username)),
        };

        if account.username != session.username {
            account.username = session.username.clone();
            if account.display_name.trim().is_empty() {
                account.display_name = session.username.clone();
            }
        }
        Ok(account)
    }

    pub fn save(&self, session: &Session, account: &UserAccount) -> Result<()> {
        if account.username != session.username {
            return Err(Error::validation(format!(
                "Settings belong to '{}', not '{}'",
                account.username, session.username
            )));
        }
        validate_avatar(&account.avatar_url)?;
        self.store.save_json(Self::key(session).as_str(), account)
    }
}

/// Reject inline images that would blow the storage quota
///
/// The limit applies to the image itself, not to its base64 text.
pub fn validate_avatar(avatar_url: &str) -> Result<()> {
    let Some(inline) = avatar_url.strip_prefix("data:") else {
        return Ok(());
    };
    let (header, payload) = inline
        .split_once(',')
        .ok_or_else(|| Error::validation("Malformed image data URL"))?;

    let size = if header.ends_with(";base64") {
        base64::engine::general_purpose::STANDARD
            .decode(payload.trim())
            .map_err(|e| Error::validation(format!("Malformed image data URL: {}", e)))?
            .len()
    } else {
        payload.len()
    };

    if size > MAX_AVATAR_BYTES {
        return Err(Error::validation(
            "Image is too large. Please choose a file smaller than 800KB.",
        ));
    }
    Ok(())
}
