//! User account settings domain model

use serde::{Deserialize, Serialize};

/// Display settings for the signed-in user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAccount {
    pub username: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub zip_code: String,
}

impl UserAccount {
    /// Default settings for a user who has never saved any
    pub fn default_for(username: &str) -> Self {
        Self {
            username: username.to_string(),
            display_name: username.to_string(),
            avatar_url: String::new(),
            zip_code: String::new(),
        }
    }

    /// Zip code if one was entered
    pub fn zip(&self) -> Option<&str> {
        let zip = self.zip_code.trim();
        (!zip.is_empty()).then_some(zip)
    }

    /// Name to greet the user with
    pub fn greeting_name(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.username
        } else {
            &self.display_name
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_for() {
        let account = UserAccount::default_for("alice");
        assert_eq!(account.username, "alice");
        assert_eq!(account.display_name, "alice");
        assert!(account.zip().is_none());
    }

    #[test]
    fn test_greeting_name_falls_back_to_username() {
        let mut account = UserAccount::default_for("alice");
        account.display_name = "  ".to_string();
        assert_eq!(account.greeting_name(), "alice");
        account.display_name = "Alice L.".to_string();
        assert_eq!(account.greeting_name(), "Alice L.");
    }

    #[test]
    fn test_missing_fields_default() {
        let account: UserAccount = serde_json::from_str(r#"{"username":"bob"}"#).unwrap();
        assert_eq!(account.display_name, "");
        assert_eq!(account.zip_code, "");
    }
}
