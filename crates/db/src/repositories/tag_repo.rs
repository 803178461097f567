//! Repository for the `tags` table.

use persona_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::status::RecordStatus;
use crate::models::tag::{CreateTag, Tag};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, character_id, name, description, status_id, created_at";

/// Provides tag reads plus the replace helper used inside character writes.
pub struct TagRepo;

impl TagRepo {
    /// Distinct names of all active tags, alphabetically.
    pub async fn list_distinct_names(pool: &PgPool) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT DISTINCT name FROM tags WHERE status_id = $1 ORDER BY name",
        )
        .bind(RecordStatus::Active.id())
        .fetch_all(pool)
        .await
    }

    /// Active tags for a batch of characters, ordered by character then id.
    pub async fn list_active_for_characters(
        pool: &PgPool,
        character_ids: &[DbId],
    ) -> Result<Vec<Tag>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tags
             WHERE character_id = ANY($1) AND status_id = $2
             ORDER BY character_id, id"
        );
        sqlx::query_as::<_, Tag>(&query)
            .bind(character_ids)
            .bind(RecordStatus::Active.id())
            .fetch_all(pool)
            .await
    }

    /// Insert tags for a character on an open connection (usually a transaction).
    pub async fn insert_many(
        conn: &mut PgConnection,
        character_id: DbId,
        tags: &[CreateTag],
    ) -> Result<(), sqlx::Error> {
        for tag in tags {
            sqlx::query("INSERT INTO tags (character_id, name, description) VALUES ($1, $2, $3)")
                .bind(character_id)
                .bind(&tag.name)
                .bind(&tag.description)
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }

    /// Deactivate every active tag of a character.
    pub async fn deactivate_for_character(
        conn: &mut PgConnection,
        character_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE tags SET status_id = $2 WHERE character_id = $1 AND status_id = $3",
        )
        .bind(character_id)
        .bind(RecordStatus::Inactive.id())
        .bind(RecordStatus::Active.id())
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }
}
