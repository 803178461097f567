//! Character category lookup.

use persona_core::types::DbId;
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `fields` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Field {
    pub id: DbId,
    pub category: String,
}
