//! Assistant service - the AI-backed features
//!
//! Builds a prompt, makes exactly one model call and shapes the answer.
//! Model failures are reported with a fixed, user-facing message.

use std::sync::Arc;

use base64::Engine;
use serde::de::DeserializeOwned;

use crate::domain::result::{Error, Result};
use crate::domain::{DateOption, DatingAdviceResponse, Message, PersonProfile};
use crate::ports::GenerativeModel;
use crate::services::audio::SpeechClip;
use crate::services::prompts;

const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Date type used when the caller leaves it blank
pub const DEFAULT_DATE_TYPE: &str = "First Date";

/// Question sent when the user did not ask anything specific
pub const GENERAL_TIPS_QUESTION: &str = "Give me some general tips.";

/// An image produced by the model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl GeneratedImage {
    /// Inline `data:` URL suitable for an avatar or an `<img>` tag
    pub fn data_url(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime_type,
            base64::engine::general_purpose::STANDARD.encode(&self.bytes)
        )
    }

    /// File extension matching the mime type
    pub fn extension(&self) -> &'static str {
        match self.mime_type.as_str() {
            "image/jpeg" => "jpg",
            "image/webp" => "webp",
            "image/gif" => "gif",
            _ => "png",
        }
    }
}

pub struct AssistantService {
    model: Arc<dyn GenerativeModel>,
}

impl AssistantService {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Suggest replies for "Me" in a pasted conversation (markdown)
    pub fn suggest_reply(&self, messages: &[Message]) -> Result<String> {
        if messages.is_empty() {
            return Err(Error::validation("Add at least one message to the conversation"));
        }
        self.text(
            &prompts::reply_suggestion(messages),
            "Failed to get reply suggestion from AI.",
        )
    }

    pub fn date_ideas(&self, profile: &PersonProfile, user_zip: Option<&str>) -> Result<String> {
        self.text(
            &prompts::date_ideas(profile, user_zip),
            "Failed to generate date ideas.",
        )
    }

    pub fn gift_ideas(&self, profile: &PersonProfile, user_zip: Option<&str>) -> Result<String> {
        self.text(
            &prompts::gift_ideas(profile, user_zip),
            "Failed to generate gift ideas.",
        )
    }

    /// Four concrete date options near `zip` at `date_time`
    pub fn plan_dates(
        &self,
        zip: &str,
        date_time: &str,
        profile: Option<&PersonProfile>,
    ) -> Result<Vec<DateOption>> {
        if zip.trim().is_empty() || date_time.trim().is_empty() {
            return Err(Error::validation("Please enter both a zip code and a date/time"));
        }
        self.json(
            &prompts::structured_date_ideas(zip.trim(), date_time.trim(), profile),
            &prompts::date_options_schema(),
            "Failed to generate date options.",
        )
    }

    pub fn gift_image(&self, prompt: &str) -> Result<GeneratedImage> {
        if prompt.trim().is_empty() {
            return Err(Error::validation("Image prompt is empty"));
        }
        let fail = || Error::generation("Failed to generate image.");
        let data = self.model.generate_image(prompt).map_err(|_| fail())?;
        let bytes = data.decode().map_err(|_| fail())?;
        let mime_type = if data.mime_type.starts_with("image/") {
            data.mime_type
        } else {
            DEFAULT_IMAGE_MIME.to_string()
        };
        Ok(GeneratedImage { mime_type, bytes })
    }

    /// Coaching for a kind of date; a blank question asks for general tips
    pub fn dating_advice(&self, date_type: &str, question: &str) -> Result<DatingAdviceResponse> {
        let date_type = match date_type.trim() {
            "" => DEFAULT_DATE_TYPE,
            date_type => date_type,
        };
        let question = match question.trim() {
            "" => GENERAL_TIPS_QUESTION,
            question => question,
        };
        self.json(
            &prompts::dating_advice(date_type, question),
            &prompts::dating_advice_schema(),
            "Failed to get dating advice. The AI might be having a moment.",
        )
    }

    /// Translate between two language codes (see [`prompts::LANGUAGES`])
    pub fn translate(&self, text: &str, source_code: &str, target_code: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(Error::validation("Nothing to translate"));
        }
        let prompt = prompts::translate(
            text,
            prompts::language_name(source_code),
            prompts::language_name(target_code),
        );
        self.text(&prompt, "Failed to translate text.")
            .map(|t| t.trim().to_string())
    }

    /// Read `text` aloud
    pub fn speak(&self, text: &str) -> Result<SpeechClip> {
        if text.trim().is_empty() {
            return Err(Error::validation("Nothing to speak"));
        }
        let fail = || Error::generation("Failed to generate speech.");
        let data = self.model.generate_speech(text).map_err(|_| fail())?;
        let bytes = data.decode().map_err(|_| fail())?;
        SpeechClip::from_speech_bytes(&bytes).map_err(|_| fail())
    }

    fn text(&self, prompt: &str, failure: &str) -> Result<String> {
        self.model
            .generate_text(prompt)
            .map_err(|_| Error::generation(failure))
    }

    fn json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        schema: &serde_json::Value,
        failure: &str,
    ) -> Result<T> {
        let value = self
            .model
            .generate_json(prompt, schema)
            .map_err(|_| Error::generation(failure))?;
        serde_json::from_value(value).map_err(|_| Error::generation(failure))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sender;
    use crate::ports::InlineData;
    use std::sync::Mutex;

    /// Returns canned answers and remembers the prompts it saw
    #[derive(Default)]
    struct CannedModel {
        text: Option<String>,
        json: Option<serde_json::Value>,
        inline: Option<InlineData>,
        prompts: Mutex<Vec<String>>,
    }

    impl CannedModel {
        fn record(&self, prompt: &str) {
            self.prompts.lock().unwrap().push(prompt.to_string());
        }
    }

    impl GenerativeModel for CannedModel {
        fn name(&self) -> &str {
            "canned"
        }

        fn generate_text(&self, prompt: &str) -> Result<String> {
            self.record(prompt);
            self.text.clone().ok_or_else(|| Error::generation("boom"))
        }

        fn generate_json(
            &self,
            prompt: &str,
            _schema: &serde_json::Value,
        ) -> Result<serde_json::Value> {
            self.record(prompt);
            self.json.clone().ok_or_else(|| Error::generation("boom"))
        }

        fn generate_image(&self, prompt: &str) -> Result<InlineData> {
            self.record(prompt);
            self.inline.clone().ok_or_else(|| Error::generation("boom"))
        }

        fn generate_speech(&self, text: &str) -> Result<InlineData> {
            self.record(text);
            self.inline.clone().ok_or_else(|| Error::generation("boom"))
        }
    }

    fn assistant(model: CannedModel) -> (Arc<CannedModel>, AssistantService) {
        let model = Arc::new(model);
        (model.clone(), AssistantService::new(model))
    }

    #[test]
    fn test_suggest_reply() {
        let (model, service) = assistant(CannedModel {
            text: Some("**Playful:** Tell me more!".to_string()),
            ..CannedModel::default()
        });
        let messages = vec![Message::new(1, Sender::Them, "I just got back from Lisbon")];

        let reply = service.suggest_reply(&messages).unwrap();
        assert_eq!(reply, "**Playful:** Tell me more!");
        assert!(model.prompts.lock().unwrap()[0].contains("Them: I just got back from Lisbon"));
    }

    #[test]
    fn test_empty_conversation_skips_model() {
        let (model, service) = assistant(CannedModel::default());
        assert!(matches!(service.suggest_reply(&[]), Err(Error::Validation(_))));
        assert!(model.prompts.lock().unwrap().is_empty());
    }

    #[test]
    fn test_failures_use_generic_message() {
        let (_, service) = assistant(CannedModel::default());
        let err = service
            .suggest_reply(&[Message::new(1, Sender::Me, "hi")])
            .unwrap_err();
        assert_eq!(err.to_string(), "Failed to get reply suggestion from AI.");

        let err = service.translate("hola", "es", "en").unwrap_err();
        assert_eq!(err.to_string(), "Failed to translate text.");
    }

    #[test]
    fn test_plan_dates_parses_options() {
        let (_, service) = assistant(CannedModel {
            json: Some(serde_json::json!([
                {"title": "Taco crawl", "location": "Mission St", "description": "Three stops.", "reasoning": "Loves food."}
            ])),
            ..CannedModel::default()
        });
        let options = service.plan_dates("94110", "2025-02-14T19:30", None).unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].location, "Mission St");
    }

    #[test]
    fn test_blank_advice_question_asks_for_general_tips() {
        let (model, service) = assistant(CannedModel {
            json: Some(serde_json::json!({
                "keyVibe": "Relaxed and curious",
                "dos": ["Ask questions"],
                "donts": ["Check your phone"],
                "outfitSuggestion": {"description": "Smart casual", "reasoning": "Easy to dress up or down."},
                "conversationStarters": ["Best trip you've taken?"],
                "questionAnswer": "Keep it light."
            })),
            ..CannedModel::default()
        });

        let advice = service.dating_advice("  ", " ").unwrap();
        assert_eq!(advice.key_vibe, "Relaxed and curious");

        let prompts = model.prompts.lock().unwrap();
        assert!(prompts[0].contains(r#"Provide advice for a "First Date" date."#));
        assert!(prompts[0].contains(r#"specific question: "Give me some general tips.""#));
    }

    #[test]
    fn test_malformed_json_is_generation_error() {
        let (_, service) = assistant(CannedModel {
            json: Some(serde_json::json!({"unexpected": true})),
            ..CannedModel::default()
        });
        let err = service.dating_advice("Coffee", "Who pays?").unwrap_err();
        assert!(matches!(err, Error::Generation(_)));
    }

    #[test]
    fn test_translate_uses_language_names() {
        let (model, service) = assistant(CannedModel {
            text: Some("  Hello  \n".to_string()),
            ..CannedModel::default()
        });
        assert_eq!(service.translate("Hola", "es", "en").unwrap(), "Hello");
        assert!(model.prompts.lock().unwrap()[0].contains("from Spanish to English"));
    }

    #[test]
    fn test_gift_image_data_url() {
        let (_, service) = assistant(CannedModel {
            inline: Some(InlineData::new("image/png", "aGVsbG8=")),
            ..CannedModel::default()
        });
        let image = service.gift_image("a mug").unwrap();
        assert_eq!(image.bytes, b"hello");
        assert_eq!(image.extension(), "png");
        assert_eq!(image.data_url(), "data:image/png;base64,aGVsbG8=");
    }

    #[test]
    fn test_speak_decodes_pcm() {
        // Two samples: 0 and 16384
        let (_, service) = assistant(CannedModel {
            inline: Some(InlineData::new("audio/L16;codec=pcm;rate=24000", "AAAAQA==")),
            ..CannedModel::default()
        });
        let clip = service.speak("Hola").unwrap();
        assert_eq!(clip.channels, vec![vec![0.0, 0.5]]);
        assert_eq!(clip.sample_rate, 24_000);
    }
}
