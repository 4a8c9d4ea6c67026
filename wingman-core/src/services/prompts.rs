//! Prompt builders for the assistant features
//!
//! Pure functions: each returns the full prompt text (and, for structured
//! features, the JSON response schema) without touching the network.

use regex::Regex;
use serde_json::{json, Value as JsonValue};

use crate::domain::{Message, PersonProfile};

/// Languages offered by the interpreter, as (code, name)
pub const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("nl", "Dutch"),
    ("ru", "Russian"),
    ("ja", "Japanese"),
    ("ko", "Korean"),
    ("zh", "Chinese (Simplified)"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
    ("sv", "Swedish"),
];

/// Display name for a language code; unknown codes are returned unchanged
pub fn language_name(code: &str) -> &str {
    LANGUAGES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code.trim()))
        .map(|(_, name)| *name)
        .unwrap_or(code)
}

/// Render a conversation as `Me: ...` / `Them: ...` lines
pub fn conversation_history(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.sender.label(), m.text))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn reply_suggestion(messages: &[Message]) -> String {
    format!(
        r#"You are Wing Man, a dating assistant AI. Your goal is to help users craft engaging, respectful, and charming replies in their dating conversations.
Analyze the following conversation and suggest a great reply for "Me".
Provide 2-3 distinct options, each with a brief explanation of the vibe (e.g., "Playful & Witty", "Direct & Confident", "Curious & Engaging").
Format the response in Markdown.

Conversation History:
{}

Suggest a reply for "Me":"#,
        conversation_history(messages)
    )
}

pub fn date_ideas(profile: &PersonProfile, user_zip: Option<&str>) -> String {
    let location_context = match user_zip {
        Some(zip) => format!(
            "The user is located in or near zip code {}. Please prioritize local venues or activities in this area if specific locations are mentioned.\n",
            zip
        ),
        None => String::new(),
    };
    let their_zip = match profile.zip() {
        Some(zip) => format!("- **Their Location (Zip):** {}\n", zip),
        None => String::new(),
    };

    format!(
        "Based on this person's profile, suggest 3 creative and personalized date ideas. For each idea, provide a title, a brief description, and why it's a good fit for them.
{location_context}
**Profile:**
- **Name:** {name}
- **Description:** {description}
- **Likes:** {likes}
- **Dislikes:** {dislikes}
- **Hobbies:** {hobbies}
- **Occupation:** {occupation}
{their_zip}
Format your response in Markdown.",
        name = profile.name,
        description = profile.description,
        likes = profile.likes,
        dislikes = profile.dislikes,
        hobbies = profile.hobbies,
        occupation = profile.occupation,
    )
}

pub fn gift_ideas(profile: &PersonProfile, user_zip: Option<&str>) -> String {
    let location_context = match user_zip {
        Some(zip) => format!(
            "The user is located in or near zip code {}. If suggesting experiences or local shops, consider this location.\n",
            zip
        ),
        None => String::new(),
    };

    format!(
        "You are a thoughtful gift-giving assistant. Based on the provided profile, brainstorm 3-5 unique and personalized gift ideas. For each idea, explain why it would be a great gift for this person.
{location_context}
Also, for one of the ideas that could be a custom-printed item (like a mug, t-shirt, or poster), provide a detailed, descriptive prompt that could be used with an AI image generator to create a cool design.

**Profile:**
- **Name:** {name}
- **Likes:** {likes}
- **Dislikes:** {dislikes}
- **Hobbies:** {hobbies}

Format your response in Markdown. The image prompt should be clearly labeled and enclosed in a code block.",
        name = profile.name,
        likes = profile.likes,
        dislikes = profile.dislikes,
        hobbies = profile.hobbies,
    )
}

/// Prompt asking for four concrete options near `zip` at `date_time`
pub fn structured_date_ideas(zip: &str, date_time: &str, profile: Option<&PersonProfile>) -> String {
    let profile_context = match profile {
        Some(p) => format!(
            "The date is with: {}.
Their Profile:
- Description: {}
- Likes: {}
- Dislikes: {}
- Hobbies: {}",
            p.name, p.description, p.likes, p.dislikes, p.hobbies
        ),
        None => "No specific profile selected. Suggest generally great date ideas.".to_string(),
    };

    format!(
        "Plan 4 distinct, creative, and specific date options for Zip Code: {zip} on Date/Time: {date_time}.

{profile_context}

Instructions:
- You act as a local expert. Suggest *specific* real venues, parks, restaurants, or activity centers known in or near {zip}.
- If the specific zip code is small, look at the immediate surrounding area.
- Ensure the ideas fit the time of day (e.g., don't suggest a breakfast place for a 8 PM date).
- Provide a diverse range of options (e.g. one active, one dining, one cultural/relaxed).

Return a JSON array of 4 objects."
    )
}

/// Response schema for [`structured_date_ideas`]
pub fn date_options_schema() -> JsonValue {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "title": { "type": "STRING", "description": "A catchy title for the date idea." },
                "location": { "type": "STRING", "description": "The specific name of the venue or place." },
                "description": { "type": "STRING", "description": "A tempting description of the activity." },
                "reasoning": { "type": "STRING", "description": "Why this is a good fit based on the profile or time." }
            },
            "required": ["title", "location", "description", "reasoning"]
        }
    })
}

pub fn dating_advice(date_type: &str, question: &str) -> String {
    format!(
        r#"You are Wing Man, an AI dating coach. Provide advice for a "{}" date.
The user has a specific question: "{}".

Please provide a comprehensive response in the requested JSON format. The vibe should be confident, friendly, and supportive."#,
        date_type, question
    )
}

/// Response schema for [`dating_advice`]
pub fn dating_advice_schema() -> JsonValue {
    let string_list = |description: &str| {
        json!({ "type": "ARRAY", "items": { "type": "STRING" }, "description": description })
    };

    json!({
        "type": "OBJECT",
        "properties": {
            "keyVibe": { "type": "STRING", "description": "A short, catchy phrase for the date's overall vibe." },
            "dos": string_list("A list of 3-4 key things to do."),
            "donts": string_list("A list of 3-4 key things to avoid."),
            "outfitSuggestion": {
                "type": "OBJECT",
                "properties": {
                    "description": { "type": "STRING", "description": "A brief description of a suitable outfit." },
                    "reasoning": { "type": "STRING", "description": "Why this outfit works for the occasion." }
                },
                "required": ["description", "reasoning"]
            },
            "conversationStarters": string_list("3-4 interesting questions or topics to bring up."),
            "icebreakerJoke": { "type": "STRING", "description": "A light-hearted, clean joke to break the ice." },
            "questionAnswer": { "type": "STRING", "description": "A direct and thoughtful answer to the user's specific question." }
        },
        "required": ["keyVibe", "dos", "donts", "outfitSuggestion", "conversationStarters", "questionAnswer"]
    })
}

/// Translation prompt; `source` and `target` are language names
pub fn translate(text: &str, source: &str, target: &str) -> String {
    format!(
        "Translate the following text from {} to {}. Only return the translated text, with no extra explanations or formatting.\n\nText: \"{}\"",
        source, target, text
    )
}

/// Pull the image-generator prompt out of a gift-ideas answer
///
/// Returns the trimmed body of the first fenced code block, if any.
pub fn extract_image_prompt(markdown: &str) -> Option<String> {
    let fence_re = Regex::new(r"(?s)```[A-Za-z0-9_-]*[ \t]*\r?\n?(.*?)```").ok()?;
    let body = fence_re.captures(markdown)?.get(1)?.as_str().trim();
    (!body.is_empty()).then(|| body.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Sender;

    fn profile() -> PersonProfile {
        let mut p = PersonProfile::new("p1", "Sam");
        p.likes = "jazz, ramen".to_string();
        p.hobbies = "climbing".to_string();
        p
    }

    #[test]
    fn test_reply_prompt_contains_history() {
        let messages = vec![
            Message::new(1, Sender::Them, "Hey! How was your weekend?"),
            Message::new(2, Sender::Me, "Great, went hiking."),
        ];
        let prompt = reply_suggestion(&messages);
        assert!(prompt.contains("Them: Hey! How was your weekend?\nMe: Great, went hiking."));
        assert!(prompt.ends_with("Suggest a reply for \"Me\":"));
    }

    #[test]
    fn test_date_ideas_location_context() {
        let without = date_ideas(&profile(), None);
        assert!(!without.contains("zip code"));
        assert!(!without.contains("Their Location"));

        let mut p = profile();
        p.zip_code = Some("94110".to_string());
        let with = date_ideas(&p, Some("10001"));
        assert!(with.contains("in or near zip code 10001"));
        assert!(with.contains("- **Their Location (Zip):** 94110"));
        assert!(with.contains("- **Likes:** jazz, ramen"));
    }

    #[test]
    fn test_gift_ideas_mentions_code_block() {
        let prompt = gift_ideas(&profile(), Some("94110"));
        assert!(prompt.contains("enclosed in a code block"));
        assert!(prompt.contains("If suggesting experiences or local shops"));
    }

    #[test]
    fn test_structured_prompt_without_profile() {
        let prompt = structured_date_ideas("94110", "2025-02-14T19:30", None);
        assert!(prompt.contains("Zip Code: 94110 on Date/Time: 2025-02-14T19:30"));
        assert!(prompt.contains("No specific profile selected"));

        let prompt = structured_date_ideas("94110", "2025-02-14T19:30", Some(&profile()));
        assert!(prompt.contains("The date is with: Sam."));
    }

    #[test]
    fn test_schemas_require_fields() {
        let schema = date_options_schema();
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(schema["items"]["required"].as_array().unwrap().len(), 4);

        let schema = dating_advice_schema();
        let required = schema["required"].as_array().unwrap();
        assert!(!required.iter().any(|v| v == "icebreakerJoke"));
        assert!(required.iter().any(|v| v == "questionAnswer"));
    }

    #[test]
    fn test_language_name() {
        assert_eq!(language_name("es"), "Spanish");
        assert_eq!(language_name("ZH"), "Chinese (Simplified)");
        assert_eq!(language_name("tlh"), "tlh");
        assert!(translate("Hola", "Spanish", "English").contains("from Spanish to English"));
    }

    #[test]
    fn test_extract_image_prompt() {
        let markdown = "## Ideas\n1. A mug\n\n**Image prompt:**\n```\n  A retro mug with a climbing cat  \n```\nmore text\n```\nsecond\n```";
        assert_eq!(
            extract_image_prompt(markdown),
            Some("A retro mug with a climbing cat".to_string())
        );

        let tagged = "```text\nNeon poster of a trumpet\n```";
        assert_eq!(extract_image_prompt(tagged), Some("Neon poster of a trumpet".to_string()));

        assert_eq!(extract_image_prompt("no fences here"), None);
        assert_eq!(extract_image_prompt("```\n   \n```"), None);
    }
}
