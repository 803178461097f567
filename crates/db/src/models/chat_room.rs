//! Chat room entity, create DTO, and joined room views.

use persona_core::types::{DbId, RoomId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::models::status::StatusId;

/// A row from the `chat_rooms` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ChatRoom {
    pub id: RoomId,
    pub user_id: DbId,
    pub prompt_id: DbId,
    pub favorability: i32,
    pub user_display_name: String,
    pub user_introduction: String,
    /// Optimistic concurrency token, bumped on every favorability write.
    #[serde(skip_serializing)]
    pub version: i64,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `POST /chat-rooms`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateChatRoom {
    pub user_id: DbId,
    pub character_id: DbId,
    #[serde(default)]
    pub user_display_name: String,
    #[serde(default)]
    pub user_introduction: String,
}

/// Outcome of [`crate::repositories::ChatRoomRepo::find_or_create`].
#[derive(Debug, Clone)]
pub struct RoomLookup {
    pub room: ChatRoom,
    pub character_id: DbId,
    /// `true` when an active room already existed for the pair.
    pub existed: bool,
}

/// An active room joined with the prompt snapshot it is bound to and the
/// owning character. Feeds both the room info endpoint and chat turns.
#[derive(Debug, Clone, FromRow)]
pub struct RoomContext {
    pub room_id: RoomId,
    pub user_id: DbId,
    pub favorability: i32,
    pub version: i64,
    pub user_display_name: String,
    pub user_introduction: String,
    pub room_created_at: Timestamp,
    pub prompt_id: DbId,
    pub appearance: String,
    pub personality: String,
    pub background: String,
    pub speech_style: String,
    pub example_dialogues: Option<String>,
    pub character_id: DbId,
    pub character_name: String,
    pub character_description: String,
    pub honorifics: Option<String>,
}

/// Room list entry with a character summary and the character's image.
#[derive(Debug, Clone, FromRow)]
pub struct RoomListing {
    pub room_id: RoomId,
    pub user_id: DbId,
    pub character_id: DbId,
    pub character_name: String,
    pub character_description: String,
    pub appearance: String,
    pub personality: String,
    pub background: String,
    pub speech_style: String,
    pub favorability: i32,
    pub room_created_at: Timestamp,
    pub image_path: Option<String>,
}
