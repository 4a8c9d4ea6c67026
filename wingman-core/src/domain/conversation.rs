//! Conversation and AI response models

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Who sent a message in a pasted conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    Them,
    Me,
}

impl Sender {
    /// Label used when the conversation is written into a prompt
    pub fn label(&self) -> &'static str {
        match self {
            Sender::Them => "Them",
            Sender::Me => "Me",
        }
    }
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "them" => Ok(Sender::Them),
            "me" => Ok(Sender::Me),
            other => Err(format!("Unknown sender '{}', expected 'me' or 'them'", other)),
        }
    }
}

/// One message in a conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: i64,
    pub sender: Sender,
    pub text: String,
}

impl Message {
    pub fn new(id: i64, sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id,
            sender,
            text: text.into(),
        }
    }

    /// Parse a `Me: text` / `Them: text` line
    pub fn parse_line(id: i64, line: &str) -> Option<Self> {
        let (who, text) = line.split_once(':')?;
        let sender = who.parse().ok()?;
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self::new(id, sender, text))
    }
}

/// A generated date suggestion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateOption {
    pub title: String,
    pub location: String,
    pub description: String,
    pub reasoning: String,
}

/// Outfit part of the dating advice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutfitSuggestion {
    pub description: String,
    pub reasoning: String,
}

/// Structured dating advice
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatingAdviceResponse {
    pub key_vibe: String,
    pub dos: Vec<String>,
    pub donts: Vec<String>,
    pub outfit_suggestion: OutfitSuggestion,
    pub conversation_starters: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icebreaker_joke: Option<String>,
    pub question_answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        let msg = Message::parse_line(1, "Them: hey, how was your weekend?").unwrap();
        assert_eq!(msg.sender, Sender::Them);
        assert_eq!(msg.text, "hey, how was your weekend?");

        let msg = Message::parse_line(2, "me:  great!").unwrap();
        assert_eq!(msg.sender, Sender::Me);
        assert_eq!(msg.text, "great!");
    }

    #[test]
    fn test_parse_line_rejects_unknown_sender() {
        assert!(Message::parse_line(1, "Bob: hi").is_none());
        assert!(Message::parse_line(1, "no colon here").is_none());
        assert!(Message::parse_line(1, "Me:   ").is_none());
    }

    #[test]
    fn test_advice_parses_without_joke() {
        let json = serde_json::json!({
            "keyVibe": "Relaxed and curious",
            "dos": ["Listen"],
            "donts": ["Check your phone"],
            "outfitSuggestion": {"description": "Dark jeans", "reasoning": "Casual venue"},
            "conversationStarters": ["Favourite trip?"],
            "questionAnswer": "Yes, offer to split."
        });
        let advice: DatingAdviceResponse = serde_json::from_value(json).unwrap();
        assert!(advice.icebreaker_joke.is_none());
        assert_eq!(advice.dos, vec!["Listen".to_string()]);
    }
}
