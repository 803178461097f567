//! Generation server wire messages.
//!
//! One [`GenerationRequest`] goes out as a single JSON text frame; one JSON
//! object comes back. Every reply field is optional on the wire and falls
//! back to a default, see [`parse_reply`].

use persona_core::persona::{DialogueLine, Honorifics};
use serde::{Deserialize, Serialize};

/// Reply text used when the server omits `text`.
pub const FALLBACK_TEXT: &str = "The character could not respond right now.";

/// Emotion used when the server omits `emotion`.
pub const DEFAULT_EMOTION: &str = "Neutral";

/// Everything the generation server needs to produce one character reply.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationRequest {
    pub user_message: String,
    pub character_name: String,
    /// Favorability threshold to honorific mapping.
    #[serde(rename = "nickname")]
    pub honorifics: Honorifics,
    /// Name the character uses for the user; wins over the honorifics.
    #[serde(rename = "user_unique_name")]
    pub user_display_name: String,
    pub user_introduction: String,
    pub favorability: i32,
    #[serde(rename = "character_appearance")]
    pub appearance: String,
    #[serde(rename = "character_personality")]
    pub personality: String,
    #[serde(rename = "character_background")]
    pub background: String,
    #[serde(rename = "character_speech_style")]
    pub speech_style: String,
    pub example_dialogues: Vec<DialogueLine>,
    pub chat_history: String,
}

/// Parsed generation reply with defaults applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReply {
    pub text: String,
    pub emotion: String,
    /// New favorability reported by the server. Not clamped.
    pub favorability: i32,
}

#[derive(Debug, Deserialize)]
struct RawReply {
    text: Option<String>,
    emotion: Option<String>,
    favorability: Option<i32>,
}

/// Parse a reply frame. `sent_favorability` is kept when the server omits
/// the field.
pub fn parse_reply(
    text: &str,
    sent_favorability: i32,
) -> Result<GenerationReply, serde_json::Error> {
    let raw: RawReply = serde_json::from_str(text)?;
    Ok(GenerationReply {
        text: raw.text.unwrap_or_else(|| FALLBACK_TEXT.to_string()),
        emotion: raw.emotion.unwrap_or_else(|| DEFAULT_EMOTION.to_string()),
        favorability: raw.favorability.unwrap_or(sent_favorability),
    })
}
