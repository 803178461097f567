//! Repository for the `fields` lookup table.

use persona_core::types::DbId;
use sqlx::PgPool;

use crate::models::field::Field;

/// Read access to character categories.
pub struct FieldRepo;

impl FieldRepo {
    /// List every field ordered by id.
    pub async fn list(pool: &PgPool) -> Result<Vec<Field>, sqlx::Error> {
        sqlx::query_as::<_, Field>("SELECT id, category FROM fields ORDER BY id")
            .fetch_all(pool)
            .await
    }

    /// Find a field by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Field>, sqlx::Error> {
        sqlx::query_as::<_, Field>("SELECT id, category FROM fields WHERE id = $1")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
