//! Per-user "top 3" aggregates over owned characters.

use persona_core::types::DbId;
use sqlx::PgPool;

use crate::models::rank::{CharacterRank, FieldRank, TagRank};
use crate::models::status::RecordStatus;

/// Read-only ranking queries.
pub struct RankRepo;

impl RankRepo {
    /// Owned active characters ranked by chat log span count across all of
    /// their rooms. Characters without any logs are not ranked.
    pub async fn top_characters(
        pool: &PgPool,
        owner_id: DbId,
        limit: i64,
    ) -> Result<Vec<CharacterRank>, sqlx::Error> {
        sqlx::query_as::<_, CharacterRank>(
            "SELECT c.id AS character_id, c.name, COUNT(l.id) AS log_count,
                    img.file_path AS image_path
             FROM characters c
             JOIN character_prompts p ON p.character_id = c.id
             JOIN chat_rooms r ON r.prompt_id = p.id
             JOIN chat_logs l ON l.room_id = r.id
             LEFT JOIN LATERAL (
                 SELECT i.file_path FROM image_mappings m
                 JOIN images i ON i.id = m.image_id
                 WHERE m.character_id = c.id AND m.status_id = $2
                 ORDER BY m.id DESC LIMIT 1
             ) img ON TRUE
             WHERE c.owner_id = $1 AND c.status_id = $2
             GROUP BY c.id, c.name, img.file_path
             ORDER BY log_count DESC, c.id
             LIMIT $3",
        )
        .bind(owner_id)
        .bind(RecordStatus::Active.id())
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Fields ranked by how many active characters the user owns in each.
    pub async fn top_fields(
        pool: &PgPool,
        owner_id: DbId,
        limit: i64,
    ) -> Result<Vec<FieldRank>, sqlx::Error> {
        sqlx::query_as::<_, FieldRank>(
            "SELECT f.id AS field_id, f.category, COUNT(c.id) AS character_count
             FROM fields f
             JOIN characters c ON c.field_id = f.id
             WHERE c.owner_id = $1 AND c.status_id = $2
             GROUP BY f.id, f.category
             ORDER BY character_count DESC, f.id
             LIMIT $3",
        )
        .bind(owner_id)
        .bind(RecordStatus::Active.id())
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Active tag names ranked by occurrences on the user's active characters.
    pub async fn top_tags(
        pool: &PgPool,
        owner_id: DbId,
        limit: i64,
    ) -> Result<Vec<TagRank>, sqlx::Error> {
        sqlx::query_as::<_, TagRank>(
            "SELECT t.name, COUNT(t.id) AS tag_count
             FROM tags t
             JOIN characters c ON c.id = t.character_id
             WHERE c.owner_id = $1 AND c.status_id = $2 AND t.status_id = $2
             GROUP BY t.name
             ORDER BY tag_count DESC, t.name
             LIMIT $3",
        )
        .bind(owner_id)
        .bind(RecordStatus::Active.id())
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
