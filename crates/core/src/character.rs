//! Character creation/update payload.
//!
//! Character endpoints accept multipart bodies whose `character_data` part
//! is a JSON document of this shape; the image travels as a separate part.

use serde::Deserialize;
use validator::Validate;

use crate::error::CoreError;
use crate::persona::{DialogueLine, Honorifics};
use crate::types::DbId;
use crate::validation::validate_input;

/// Persona definition submitted when creating or updating a character.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CharacterPayload {
    pub owner_id: DbId,
    pub field_id: DbId,
    pub voice_id: Option<String>,
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    pub description: String,
    /// Defaults to [`crate::persona::default_honorifics`] when omitted.
    pub honorifics: Option<Honorifics>,
    pub appearance: String,
    pub personality: String,
    pub background: String,
    pub speech_style: String,
    #[serde(default)]
    pub example_dialogues: Vec<DialogueLine>,
    /// `None` leaves existing tags untouched on update.
    pub tags: Option<Vec<TagInput>>,
}

/// A tag attached to a character at creation or update time.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TagInput {
    #[validate(length(min = 1, max = 50, message = "tag name must be 1-50 characters"))]
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl CharacterPayload {
    /// Parse and validate the JSON `character_data` multipart field.
    ///
    /// A missing required field surfaces as [`CoreError::Validation`].
    pub fn from_json(raw: &str) -> Result<Self, CoreError> {
        let payload: Self = serde_json::from_str(raw)
            .map_err(|e| CoreError::Validation(format!("Invalid character_data: {e}")))?;
        validate_input(&payload)?;
        for tag in payload.tags.iter().flatten() {
            validate_input(tag)?;
        }
        Ok(payload)
    }
}
