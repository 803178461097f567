//! Handlers for the `/tags` resource.

use axum::extract::State;
use axum::Json;
use persona_db::repositories::TagRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/tags
///
/// Distinct names of all active tags, alphabetically.
pub async fn list_tag_names(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<String>>>> {
    let names = TagRepo::list_distinct_names(&state.pool).await?;
    Ok(Json(DataResponse { data: names }))
}
