//! Follow edge between a user and a character.

use persona_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::status::StatusId;

/// A row from the `friends` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Friend {
    pub id: DbId,
    pub user_id: DbId,
    pub character_id: DbId,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `POST /follows`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateFollow {
    pub user_id: DbId,
    pub character_id: DbId,
}
