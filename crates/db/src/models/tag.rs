//! Character tag entity and DTOs.

use persona_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::status::StatusId;

/// A row from the `tags` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
    pub id: DbId,
    pub character_id: DbId,
    pub name: String,
    pub description: String,
    pub status_id: StatusId,
    pub created_at: Timestamp,
}

/// Insert DTO for a tag attached to a character.
#[derive(Debug, Clone)]
pub struct CreateTag {
    pub name: String,
    pub description: String,
}
