//! Gemini API client
//!
//! Handles communication with the Gemini `generateContent` REST endpoint for
//! text, structured JSON, image and speech generation.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use url::Url;

use crate::domain::result::Error;
use crate::ports::{GenerativeModel, InlineData};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_SPEECH_MODEL: &str = "gemini-2.5-flash-preview-tts";
pub const DEFAULT_VOICE: &str = "Kore";

const REQUEST_TIMEOUT_SECS: u64 = 60;

/// Model names used for each kind of output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeminiModels {
    pub text: String,
    pub image: String,
    pub speech: String,
    pub voice: String,
}

impl Default for GeminiModels {
    fn default() -> Self {
        Self {
            text: DEFAULT_TEXT_MODEL.to_string(),
            image: DEFAULT_IMAGE_MODEL.to_string(),
            speech: DEFAULT_SPEECH_MODEL.to_string(),
            voice: DEFAULT_VOICE.to_string(),
        }
    }
}

/// Gemini API client
#[derive(Debug)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    models: GeminiModels,
}

// === Request types ===

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_schema: Option<&'a JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    speech_config: Option<JsonValue>,
}

// === Response types ===

/// Gemini API response
#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
    #[serde(rename = "finishReason", default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(rename = "inlineData", default)]
    pub inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate
    pub fn text(&self) -> Option<String> {
        let parts = &self.candidates.first()?.content.as_ref()?.parts;
        let text: String = parts.iter().filter_map(|p| p.text.as_deref()).collect();
        (!text.is_empty()).then_some(text)
    }

    /// First inline data part of the first candidate
    pub fn inline_data(&self) -> Option<&InlineData> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .iter()
            .find_map(|p| p.inline_data.as_ref())
    }
}

impl GeminiClient {
    /// Create a new Gemini client
    ///
    /// The base URL must use HTTPS unless it points at the local machine.
    pub fn new(api_key: &str, base_url: &str, models: GeminiModels) -> Result<Self> {
        if api_key.trim().is_empty() {
            anyhow::bail!("API key not set");
        }

        let parsed = Url::parse(base_url).context("Invalid URL format")?;
        let host = parsed.host_str().unwrap_or("");
        let is_local = host == "localhost" || host == "127.0.0.1";
        if parsed.scheme() != "https" && !(parsed.scheme() == "http" && is_local) {
            anyhow::bail!("Gemini base URL must use HTTPS");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            models,
        })
    }

    pub fn models(&self) -> &GeminiModels {
        &self.models
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    /// Send a generateContent request
    fn generate_content(
        &self,
        model: &str,
        prompt: &str,
        config: Option<GenerationConfig<'_>>,
    ) -> Result<GenerateContentResponse> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![TextPart { text: prompt }],
            }],
            generation_config: config,
        };

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .context("Failed to reach Gemini API")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            let detail = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| match b.error.status {
                    Some(s) => format!("{} ({})", b.error.message, s),
                    None => b.error.message,
                })
                .unwrap_or(body);
            anyhow::bail!("Gemini API returned {}: {}", status.as_u16(), detail);
        }

        response
            .json::<GenerateContentResponse>()
            .context("Failed to parse Gemini response")
    }
}

/// Strip a ```json fence if the model wrapped its JSON in one
fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => {
            let rest = rest.strip_prefix("json").unwrap_or(rest);
            rest.strip_suffix("```").unwrap_or(rest).trim()
        }
        None => trimmed,
    }
}

fn generation_error(e: anyhow::Error) -> Error {
    Error::generation(format!("{:#}", e))
}

impl GenerativeModel for GeminiClient {
    fn name(&self) -> &str {
        "gemini"
    }

    fn generate_text(&self, prompt: &str) -> crate::domain::result::Result<String> {
        let response = self
            .generate_content(&self.models.text, prompt, None)
            .map_err(generation_error)?;
        response
            .text()
            .ok_or_else(|| Error::generation("No text was generated."))
    }

    fn generate_json(
        &self,
        prompt: &str,
        schema: &JsonValue,
    ) -> crate::domain::result::Result<JsonValue> {
        let config = GenerationConfig {
            response_mime_type: Some("application/json"),
            response_schema: Some(schema),
            ..GenerationConfig::default()
        };
        let response = self
            .generate_content(&self.models.text, prompt, Some(config))
            .map_err(generation_error)?;
        let text = response
            .text()
            .ok_or_else(|| Error::generation("No JSON was generated."))?;
        Ok(serde_json::from_str(strip_code_fence(&text))?)
    }

    fn generate_image(&self, prompt: &str) -> crate::domain::result::Result<InlineData> {
        let config = GenerationConfig {
            response_modalities: Some(vec!["IMAGE"]),
            ..GenerationConfig::default()
        };
        let response = self
            .generate_content(&self.models.image, prompt, Some(config))
            .map_err(generation_error)?;
        response
            .inline_data()
            .cloned()
            .ok_or_else(|| Error::generation("No image was generated."))
    }

    fn generate_speech(&self, text: &str) -> crate::domain::result::Result<InlineData> {
        let config = GenerationConfig {
            response_modalities: Some(vec!["AUDIO"]),
            speech_config: Some(serde_json::json!({
                "voiceConfig": {
                    "prebuiltVoiceConfig": { "voiceName": self.models.voice }
                }
            })),
            ..GenerationConfig::default()
        };
        let response = self
            .generate_content(&self.models.speech, text, Some(config))
            .map_err(generation_error)?;
        response
            .inline_data()
            .cloned()
            .ok_or_else(|| Error::generation("No audio data received from API."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_plain_http() {
        let result = GeminiClient::new("key", "http://example.com", GeminiModels::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_allows_local_http() {
        let client =
            GeminiClient::new("key", "http://127.0.0.1:8080/", GeminiModels::default()).unwrap();
        assert_eq!(
            client.endpoint("gemini-2.5-flash"),
            "http://127.0.0.1:8080/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_rejects_empty_key() {
        assert!(GeminiClient::new("  ", DEFAULT_BASE_URL, GeminiModels::default()).is_err());
    }

    #[test]
    fn test_request_serialization() {
        let schema = serde_json::json!({"type": "ARRAY"});
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![TextPart { text: "hello" }],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json"),
                response_schema: Some(&schema),
                ..GenerationConfig::default()
            }),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(json["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(json["generationConfig"]["responseSchema"]["type"], "ARRAY");
        assert!(json["generationConfig"].get("responseModalities").is_none());
    }

    #[test]
    fn test_response_text_and_inline_data() {
        let body = serde_json::json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "Hello "},
                    {"text": "there"},
                    {"inlineData": {"mimeType": "audio/L16;rate=24000", "data": "AAA="}}
                ]},
                "finishReason": "STOP"
            }]
        });
        let response: GenerateContentResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.text(), Some("Hello there".to_string()));
        assert_eq!(response.inline_data().unwrap().mime_type, "audio/L16;rate=24000");
    }

    #[test]
    fn test_empty_response() {
        let response: GenerateContentResponse =
            serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(response.text().is_none());
        assert!(response.inline_data().is_none());
    }

    #[test]
    fn test_strip_code_fence() {
        assert_eq!(strip_code_fence("```json\n[1]\n```"), "[1]");
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
    }
}
