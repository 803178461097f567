//! Repository for the `chat_rooms` table.

use persona_core::types::{DbId, RoomId};
use sqlx::PgPool;

use crate::models::chat_room::{ChatRoom, CreateChatRoom, RoomContext, RoomListing, RoomLookup};
use crate::models::status::RecordStatus;
use crate::repositories::PromptRepo;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, prompt_id, favorability, user_display_name, \
                       user_introduction, version, status_id, created_at, updated_at";

/// Active room joined with its bound prompt snapshot and owning character.
const CONTEXT_SELECT: &str = "\
    SELECT r.id AS room_id, r.user_id, r.favorability, r.version, r.user_display_name, \
           r.user_introduction, r.created_at AS room_created_at, \
           p.id AS prompt_id, p.appearance, p.personality, p.background, p.speech_style, \
           p.example_dialogues, \
           c.id AS character_id, c.name AS character_name, \
           c.description AS character_description, c.honorifics \
    FROM chat_rooms r \
    JOIN character_prompts p ON p.id = r.prompt_id \
    JOIN characters c ON c.id = p.character_id \
    WHERE r.status_id = 1";

/// Active rooms of active characters with the character's newest active image.
const LISTING_SELECT: &str = "\
    SELECT r.id AS room_id, r.user_id, c.id AS character_id, c.name AS character_name, \
           c.description AS character_description, p.appearance, p.personality, \
           p.background, p.speech_style, r.favorability, r.created_at AS room_created_at, \
           img.file_path AS image_path \
    FROM chat_rooms r \
    JOIN character_prompts p ON p.id = r.prompt_id \
    JOIN characters c ON c.id = p.character_id \
    LEFT JOIN LATERAL ( \
        SELECT i.file_path FROM image_mappings m \
        JOIN images i ON i.id = m.image_id \
        WHERE m.character_id = c.id AND m.status_id = 1 \
        ORDER BY m.id DESC LIMIT 1 \
    ) img ON TRUE \
    WHERE r.status_id = 1 AND c.status_id = 1";

/// Provides room lifecycle operations and the favorability write.
pub struct ChatRoomRepo;

impl ChatRoomRepo {
    /// Return the active room for `(user, current prompt of character)`,
    /// creating it if none exists.
    ///
    /// Returns `None` when the character is missing, inactive, or has no
    /// prompt. Concurrent creators converge on one row through the
    /// `uq_chat_rooms_active` partial index.
    pub async fn find_or_create(
        pool: &PgPool,
        input: &CreateChatRoom,
    ) -> Result<Option<RoomLookup>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let active: Option<DbId> =
            sqlx::query_scalar("SELECT id FROM characters WHERE id = $1 AND status_id = $2")
                .bind(input.character_id)
                .bind(RecordStatus::Active.id())
                .fetch_optional(&mut *tx)
                .await?;
        if active.is_none() {
            return Ok(None);
        }
        let Some(prompt) = PromptRepo::find_current(&mut *tx, input.character_id).await? else {
            return Ok(None);
        };

        let insert = format!(
            "INSERT INTO chat_rooms (id, user_id, prompt_id, user_display_name, user_introduction)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (user_id, prompt_id) WHERE status_id = 1 DO NOTHING
             RETURNING {COLUMNS}"
        );
        let created = sqlx::query_as::<_, ChatRoom>(&insert)
            .bind(RoomId::new_v4())
            .bind(input.user_id)
            .bind(prompt.id)
            .bind(&input.user_display_name)
            .bind(&input.user_introduction)
            .fetch_optional(&mut *tx)
            .await?;

        let (room, existed) = match created {
            Some(room) => (room, false),
            None => {
                let select = format!(
                    "SELECT {COLUMNS} FROM chat_rooms
                     WHERE user_id = $1 AND prompt_id = $2 AND status_id = $3"
                );
                let room = sqlx::query_as::<_, ChatRoom>(&select)
                    .bind(input.user_id)
                    .bind(prompt.id)
                    .bind(RecordStatus::Active.id())
                    .fetch_one(&mut *tx)
                    .await?;
                (room, true)
            }
        };

        tx.commit().await?;
        Ok(Some(RoomLookup {
            room,
            character_id: input.character_id,
            existed,
        }))
    }

    /// Find an active room by id.
    pub async fn find_by_id(pool: &PgPool, id: RoomId) -> Result<Option<ChatRoom>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM chat_rooms WHERE id = $1 AND status_id = $2");
        sqlx::query_as::<_, ChatRoom>(&query)
            .bind(id)
            .bind(RecordStatus::Active.id())
            .fetch_optional(pool)
            .await
    }

    /// Active room with its bound persona snapshot.
    pub async fn find_context(
        pool: &PgPool,
        id: RoomId,
    ) -> Result<Option<RoomContext>, sqlx::Error> {
        let query = format!("{CONTEXT_SELECT} AND r.id = $1");
        sqlx::query_as::<_, RoomContext>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Write a new favorability if the room still carries `expected_version`.
    ///
    /// Returns `false` when another writer bumped the version first (or the
    /// room was deactivated meanwhile); the caller decides whether to retry.
    pub async fn update_favorability(
        pool: &PgPool,
        id: RoomId,
        expected_version: i64,
        favorability: i32,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE chat_rooms SET favorability = $3, version = version + 1
             WHERE id = $1 AND version = $2 AND status_id = $4",
        )
        .bind(id)
        .bind(expected_version)
        .bind(favorability)
        .bind(RecordStatus::Active.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// All active rooms, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<RoomListing>, sqlx::Error> {
        let query = format!("{LISTING_SELECT} ORDER BY r.created_at DESC");
        sqlx::query_as::<_, RoomListing>(&query)
            .fetch_all(pool)
            .await
    }

    /// Active rooms of one user, newest first.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<RoomListing>, sqlx::Error> {
        let query = format!("{LISTING_SELECT} AND r.user_id = $1 ORDER BY r.created_at DESC");
        sqlx::query_as::<_, RoomListing>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Deactivate a room. Returns `true` if an active row was updated.
    pub async fn deactivate(pool: &PgPool, id: RoomId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE chat_rooms SET status_id = $2 WHERE id = $1 AND status_id = $3")
                .bind(id)
                .bind(RecordStatus::Inactive.id())
                .bind(RecordStatus::Active.id())
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
