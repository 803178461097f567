//! Repository for the immutable `chat_logs` table.

use persona_core::types::RoomId;
use sqlx::PgPool;

use crate::models::chat_log::{ChatLog, CreateChatLog};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, room_id, start_time, end_time, transcript, created_at";

/// Append and read chat transcript spans. Rows are never updated.
pub struct ChatLogRepo;

impl ChatLogRepo {
    /// Record a transcript span for a room.
    pub async fn create(
        pool: &PgPool,
        room_id: RoomId,
        input: &CreateChatLog,
    ) -> Result<ChatLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO chat_logs (room_id, start_time, end_time, transcript)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ChatLog>(&query)
            .bind(room_id)
            .bind(input.start_time)
            .bind(input.end_time)
            .bind(&input.transcript)
            .fetch_one(pool)
            .await
    }

    /// All spans of a room ordered by `start_time`.
    pub async fn list_by_room(pool: &PgPool, room_id: RoomId) -> Result<Vec<ChatLog>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM chat_logs WHERE room_id = $1 ORDER BY start_time, id");
        sqlx::query_as::<_, ChatLog>(&query)
            .bind(room_id)
            .fetch_all(pool)
            .await
    }

    /// Transcripts of the `limit` most recently ended spans, oldest first.
    pub async fn recent_transcripts(
        pool: &PgPool,
        room_id: RoomId,
        limit: i64,
    ) -> Result<Vec<String>, sqlx::Error> {
        let mut transcripts = sqlx::query_scalar::<_, String>(
            "SELECT transcript FROM chat_logs
             WHERE room_id = $1
             ORDER BY end_time DESC, id DESC
             LIMIT $2",
        )
        .bind(room_id)
        .bind(limit)
        .fetch_all(pool)
        .await?;
        transcripts.reverse();
        Ok(transcripts)
    }
}
