//! Configuration management
//!
//! Settings live in `settings.json` inside the Wing Man directory:
//! ```json
//! {
//!   "app": { "loginDelayMs": 0 },
//!   "ai": { "apiKey": "...", "textModel": "gemini-2.5-flash", ... }
//! }
//! ```

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::adapters::gemini::{
    GeminiModels, DEFAULT_BASE_URL, DEFAULT_IMAGE_MODEL, DEFAULT_SPEECH_MODEL, DEFAULT_TEXT_MODEL,
    DEFAULT_VOICE,
};

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(default)]
    ai: AiSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default)]
    login_delay_ms: u64,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AiSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    image_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    speech_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    voice: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Wing Man configuration (simplified view of settings)
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    pub models: GeminiModels,
    /// Artificial pause before login/registration is checked
    pub login_delay: Duration,
    // Keep the raw settings for preservation when saving
    _raw_settings: SettingsFile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            models: GeminiModels::default(),
            login_delay: Duration::ZERO,
            _raw_settings: SettingsFile::default(),
        }
    }
}

/// Read the API key override from the environment
///
/// `WINGMAN_API_KEY` wins over the generic `API_KEY`.
fn api_key_from_env() -> Option<String> {
    ["WINGMAN_API_KEY", "API_KEY"]
        .iter()
        .filter_map(|name| std::env::var(name).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

impl Config {
    /// Load config from the Wing Man directory
    ///
    /// A missing or unreadable settings file yields the defaults. The API key
    /// can be supplied through the environment instead of the file.
    pub fn load(wingman_dir: &Path) -> Result<Self> {
        let settings_path = wingman_dir.join("settings.json");

        let raw: SettingsFile = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str(&content).unwrap_or_default()
        } else {
            SettingsFile::default()
        };

        let api_key = api_key_from_env().or_else(|| {
            raw.ai
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty())
        });

        let models = GeminiModels {
            text: raw.ai.text_model.clone().unwrap_or_else(|| DEFAULT_TEXT_MODEL.to_string()),
            image: raw.ai.image_model.clone().unwrap_or_else(|| DEFAULT_IMAGE_MODEL.to_string()),
            speech: raw.ai.speech_model.clone().unwrap_or_else(|| DEFAULT_SPEECH_MODEL.to_string()),
            voice: raw.ai.voice.clone().unwrap_or_else(|| DEFAULT_VOICE.to_string()),
        };

        Ok(Self {
            api_key,
            base_url: raw
                .ai
                .base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            models,
            login_delay: Duration::from_millis(raw.app.login_delay_ms),
            _raw_settings: raw,
        })
    }

    /// Save config to the Wing Man directory
    /// Preserves other settings that Wing Man doesn't manage
    pub fn save(&self, wingman_dir: &Path) -> Result<()> {
        let settings_path = wingman_dir.join("settings.json");

        let mut settings = if settings_path.exists() {
            let content = std::fs::read_to_string(&settings_path)?;
            serde_json::from_str::<SettingsFile>(&content).unwrap_or_default()
        } else {
            self._raw_settings.clone()
        };

        settings.app.login_delay_ms = self.login_delay.as_millis() as u64;
        settings.ai.base_url = Some(self.base_url.clone());
        settings.ai.text_model = Some(self.models.text.clone());
        settings.ai.image_model = Some(self.models.image.clone());
        settings.ai.speech_model = Some(self.models.speech.clone());
        settings.ai.voice = Some(self.models.voice.clone());
        // Only persist a key that came from the file; env keys stay in the env
        if api_key_from_env().is_none() {
            settings.ai.api_key = self.api_key.clone();
        }

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(&settings_path, content)?;
        Ok(())
    }

    /// The configured API key, or a configuration error
    pub fn require_api_key(&self) -> crate::domain::result::Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| {
                crate::domain::result::Error::Config(
                    "API key not set. Set WINGMAN_API_KEY or ai.apiKey in settings.json"
                        .to_string(),
                )
            })
    }
}
