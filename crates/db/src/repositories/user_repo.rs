//! Repository for the `users` table.

use persona_core::types::DbId;
use sqlx::PgPool;

use crate::models::status::RecordStatus;
use crate::models::user::{CreateUser, UpdateUser, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, login_id, nickname, password_hash, profile_image, status_id, created_at, updated_at";

/// Provides CRUD operations for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user, returning the created row.
    ///
    /// A duplicate `login_id` fails with the `uq_users_login_id` constraint.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (login_id, nickname, password_hash)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.login_id)
            .bind(&input.nickname)
            .bind(&input.password_hash)
            .fetch_one(pool)
            .await
    }

    /// Find an active user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1 AND status_id = $2");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(RecordStatus::Active.id())
            .fetch_optional(pool)
            .await
    }

    /// Find an active user by login id (case-sensitive).
    pub async fn find_by_login_id(
        pool: &PgPool,
        login_id: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE login_id = $1 AND status_id = $2");
        sqlx::query_as::<_, User>(&query)
            .bind(login_id)
            .bind(RecordStatus::Active.id())
            .fetch_optional(pool)
            .await
    }

    /// Update an active user. Only non-`None` fields in `input` are applied.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateUser,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!(
            "UPDATE users SET
                nickname = COALESCE($2, nickname),
                password_hash = COALESCE($3, password_hash),
                profile_image = COALESCE($4, profile_image)
             WHERE id = $1 AND status_id = $5
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .bind(&input.nickname)
            .bind(&input.password_hash)
            .bind(&input.profile_image)
            .bind(RecordStatus::Active.id())
            .fetch_optional(pool)
            .await
    }

    /// Soft-deactivate a user. Returns `true` if the row was updated.
    pub async fn deactivate(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET status_id = $2 WHERE id = $1 AND status_id = $3")
            .bind(id)
            .bind(RecordStatus::Inactive.id())
            .bind(RecordStatus::Active.id())
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
