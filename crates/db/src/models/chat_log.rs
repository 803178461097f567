//! Immutable chat transcript spans.

use persona_core::types::{DbId, RoomId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `chat_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatLog {
    pub id: DbId,
    pub room_id: RoomId,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub transcript: String,
    pub created_at: Timestamp,
}

/// Request body for recording a transcript span.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateChatLog {
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub transcript: String,
}
