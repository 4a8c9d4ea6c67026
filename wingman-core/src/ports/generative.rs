//! Generative model port
//!
//! Defines the interface to the hosted generative-AI service. The assistant
//! only needs four shapes of output: free text, JSON matching a schema, an
//! image, and synthesized speech.

use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::domain::result::{Error, Result};

/// Binary payload returned inline by the model (base64 encoded)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl InlineData {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Decode the base64 payload
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(self.data.trim())
            .map_err(|e| Error::validation(format!("Invalid base64 payload: {}", e)))
    }
}

/// Generative model trait
///
/// Every call is a single request/response. Implementations do not retry and
/// cannot be cancelled once started.
pub trait GenerativeModel: Send + Sync {
    /// Model family name (e.g., "gemini")
    fn name(&self) -> &str;

    /// Generate free text (usually markdown) for a prompt
    fn generate_text(&self, prompt: &str) -> Result<String>;

    /// Generate a JSON document matching `schema`
    ///
    /// # Arguments
    /// * `prompt` - Instructions for the model
    /// * `schema` - Response schema in the service's schema dialect
    fn generate_json(&self, prompt: &str, schema: &JsonValue) -> Result<JsonValue>;

    /// Generate an image from a text description
    fn generate_image(&self, prompt: &str) -> Result<InlineData>;

    /// Synthesize speech for `text`
    ///
    /// Returns raw little-endian 16-bit PCM at the service's fixed sample rate.
    fn generate_speech(&self, text: &str) -> Result<InlineData>;
}
