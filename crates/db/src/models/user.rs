//! User account entity and DTOs.

use persona_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::status::StatusId;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub login_id: String,
    pub nickname: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub profile_image: Option<String>,
    pub status_id: StatusId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert DTO. The password is already hashed by the caller.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub login_id: String,
    pub nickname: String,
    pub password_hash: String,
}

/// Patch DTO. `None` fields keep their current value.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub nickname: Option<String>,
    pub password_hash: Option<String>,
    pub profile_image: Option<String>,
}
