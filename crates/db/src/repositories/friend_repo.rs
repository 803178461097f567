//! Repository for the `friends` follow edges.

use persona_core::types::DbId;
use sqlx::PgPool;

use crate::models::friend::Friend;
use crate::models::status::RecordStatus;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, character_id, status_id, created_at, updated_at";

/// Follow, unfollow, and follow checks.
pub struct FriendRepo;

impl FriendRepo {
    /// Create an active follow edge.
    ///
    /// Fails with the `uq_friends_active` unique violation when the edge is
    /// already active; inactive history rows do not block a re-follow.
    pub async fn follow(
        pool: &PgPool,
        user_id: DbId,
        character_id: DbId,
    ) -> Result<Friend, sqlx::Error> {
        let query = format!(
            "INSERT INTO friends (user_id, character_id)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Friend>(&query)
            .bind(user_id)
            .bind(character_id)
            .fetch_one(pool)
            .await
    }

    /// Deactivate the active edge. Returns `false` if there was none.
    pub async fn unfollow(
        pool: &PgPool,
        user_id: DbId,
        character_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE friends SET status_id = $3
             WHERE user_id = $1 AND character_id = $2 AND status_id = $4",
        )
        .bind(user_id)
        .bind(character_id)
        .bind(RecordStatus::Inactive.id())
        .bind(RecordStatus::Active.id())
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether an active edge exists.
    pub async fn is_following(
        pool: &PgPool,
        user_id: DbId,
        character_id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(
                SELECT 1 FROM friends
                WHERE user_id = $1 AND character_id = $2 AND status_id = $3
             )",
        )
        .bind(user_id)
        .bind(character_id)
        .bind(RecordStatus::Active.id())
        .fetch_one(pool)
        .await
    }
}
