//! Persona field parsing and serialization.
//!
//! Characters store their honorific table and prompts store their example
//! dialogues as serialized JSON text. Historical rows were written by older
//! clients and may contain control characters or be outright malformed, so
//! every read goes through the lenient parsers here: bad data degrades to an
//! empty default instead of failing the request.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Favorability threshold (as a string key, e.g. `"30"`) mapped to the
/// honorific the character uses for the user at that level.
pub type Honorifics = BTreeMap<String, String>;

/// One speaker/utterance pair of an example dialogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DialogueLine {
    pub speaker: String,
    pub utterance: String,
}

/// Honorific table applied when a new character omits one.
pub fn default_honorifics() -> Honorifics {
    BTreeMap::from([
        ("30".to_string(), "stranger".to_string()),
        ("70".to_string(), "friend".to_string()),
        ("100".to_string(), "best friend".to_string()),
    ])
}

/// Remove ASCII control characters (`0x00..=0x1F` and `0x7F`).
///
/// Raw newlines and tabs inside JSON string literals make the document
/// invalid; dropping them recovers most hand-edited rows.
pub fn strip_control_chars(raw: &str) -> String {
    raw.chars()
        .filter(|c| !matches!(*c, '\u{00}'..='\u{1F}' | '\u{7F}'))
        .collect()
}

/// Parse a stored honorific table. Absent or malformed input yields an empty map.
pub fn parse_honorifics(raw: Option<&str>) -> Honorifics {
    raw.and_then(|text| serde_json::from_str(&strip_control_chars(text)).ok())
        .unwrap_or_default()
}

/// Parse stored example dialogues. Absent or malformed input yields an empty list.
pub fn parse_dialogues(raw: Option<&str>) -> Vec<DialogueLine> {
    raw.and_then(|text| serde_json::from_str(&strip_control_chars(text)).ok())
        .unwrap_or_default()
}

/// Serialize an honorific table for storage.
pub fn serialize_honorifics(honorifics: &Honorifics) -> String {
    // A string-keyed map of strings cannot fail to serialize.
    serde_json::to_string(honorifics).unwrap_or_else(|_| "{}".to_string())
}

/// Serialize example dialogues for storage. An empty list is stored as `NULL`.
pub fn serialize_dialogues(dialogues: &[DialogueLine]) -> Option<String> {
    if dialogues.is_empty() {
        return None;
    }
    serde_json::to_string(dialogues).ok()
}
