//! Person profile domain model

use serde::{Deserialize, Serialize};

/// Someone the user is dating or getting to know
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonProfile {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub likes: String,
    #[serde(default)]
    pub dislikes: String,
    #[serde(default)]
    pub hobbies: String,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zip_code: Option<String>,
}

impl PersonProfile {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            avatar_url: String::new(),
            description: String::new(),
            likes: String::new(),
            dislikes: String::new(),
            hobbies: String::new(),
            occupation: String::new(),
            notes: String::new(),
            zip_code: None,
        }
    }

    /// Zip code if one was entered
    pub fn zip(&self) -> Option<&str> {
        self.zip_code.as_deref().map(str::trim).filter(|z| !z.is_empty())
    }
}

/// Fields for a profile that has not been saved yet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDraft {
    pub name: String,
    #[serde(default)]
    pub avatar_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub likes: String,
    #[serde(default)]
    pub dislikes: String,
    #[serde(default)]
    pub hobbies: String,
    #[serde(default)]
    pub occupation: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub zip_code: Option<String>,
}

impl ProfileDraft {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Turn the draft into a stored profile under the given id
    pub fn into_profile(self, id: String) -> PersonProfile {
        PersonProfile {
            id,
            name: self.name.trim().to_string(),
            avatar_url: self.avatar_url,
            description: self.description,
            likes: self.likes,
            dislikes: self.dislikes,
            hobbies: self.hobbies,
            occupation: self.occupation,
            notes: self.notes,
            zip_code: self.zip_code.filter(|z| !z.trim().is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_json_is_camel_case() {
        let mut profile = PersonProfile::new("1700000000000", "Sam");
        profile.avatar_url = "https://example.com/a.png".to_string();
        profile.zip_code = Some("94110".to_string());

        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(json["avatarUrl"], "https://example.com/a.png");
        assert_eq!(json["zipCode"], "94110");
        assert!(json.get("avatar_url").is_none());
    }

    #[test]
    fn test_profile_without_zip_omits_field() {
        let profile = PersonProfile::new("1", "Sam");
        let json = serde_json::to_value(&profile).unwrap();
        assert!(json.get("zipCode").is_none());
        assert!(profile.zip().is_none());
    }

    #[test]
    fn test_draft_into_profile_drops_blank_zip() {
        let mut draft = ProfileDraft::named("  Jordan ");
        draft.zip_code = Some("  ".to_string());
        let profile = draft.into_profile("abc".to_string());
        assert_eq!(profile.name, "Jordan");
        assert_eq!(profile.id, "abc");
        assert!(profile.zip_code.is_none());
    }
}
