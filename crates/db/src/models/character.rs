//! Character, prompt snapshot, and joined character view models.

use persona_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::status::StatusId;

// ---------------------------------------------------------------------------
// Entity structs (database rows)
// ---------------------------------------------------------------------------

/// A row from the `characters` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Character {
    pub id: DbId,
    pub owner_id: DbId,
    pub field_id: DbId,
    pub voice_id: Option<String>,
    pub name: String,
    pub description: String,
    /// Serialized JSON object; parse with `persona_core::persona::parse_honorifics`.
    pub honorifics: Option<String>,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `character_prompts` table. Never updated after insert.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CharacterPrompt {
    pub id: DbId,
    pub character_id: DbId,
    pub version: i32,
    pub appearance: String,
    pub personality: String,
    pub background: String,
    pub speech_style: String,
    pub example_dialogues: Option<String>,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Read models (joins)
// ---------------------------------------------------------------------------

/// An active character joined with its current prompt, active image, and
/// live follower count.
#[derive(Debug, Clone, FromRow)]
pub struct CharacterView {
    pub id: DbId,
    pub owner_id: DbId,
    pub field_id: DbId,
    pub voice_id: Option<String>,
    pub name: String,
    pub description: String,
    pub honorifics: Option<String>,
    pub created_at: Timestamp,
    pub prompt_id: DbId,
    pub prompt_version: i32,
    pub appearance: String,
    pub personality: String,
    pub background: String,
    pub speech_style: String,
    pub example_dialogues: Option<String>,
    pub image_path: Option<String>,
    pub follower_count: i64,
}

/// Search hit: just enough to render a result list.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CharacterSummary {
    pub id: DbId,
    pub name: String,
    pub description: String,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// Base character columns written on create and replaced on update.
#[derive(Debug, Clone)]
pub struct CharacterFields {
    pub owner_id: DbId,
    pub field_id: DbId,
    pub voice_id: Option<String>,
    pub name: String,
    pub description: String,
    pub honorifics: String,
}

/// Persona snapshot appended as a new prompt version.
#[derive(Debug, Clone)]
pub struct CreatePrompt {
    pub appearance: String,
    pub personality: String,
    pub background: String,
    pub speech_style: String,
    pub example_dialogues: Option<String>,
}
