//! Aggregates behind the per-user "top 3" endpoints.

use persona_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// An owned character ranked by how many chat log spans it has.
#[derive(Debug, Clone, FromRow)]
pub struct CharacterRank {
    pub character_id: DbId,
    pub name: String,
    pub log_count: i64,
    pub image_path: Option<String>,
}

/// A field ranked by how many of the user's characters belong to it.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FieldRank {
    pub field_id: DbId,
    pub category: String,
    pub character_count: i64,
}

/// A tag name ranked by how often it appears on the user's characters.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TagRank {
    pub name: String,
    pub tag_count: i64,
}
