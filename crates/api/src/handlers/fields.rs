//! Handlers for the `/fields` lookup.

use axum::extract::State;
use axum::Json;
use persona_db::models::field::Field;
use persona_db::repositories::FieldRepo;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/fields
pub async fn list_fields(State(state): State<AppState>) -> AppResult<Json<DataResponse<Vec<Field>>>> {
    let fields = FieldRepo::list(&state.pool).await?;
    Ok(Json(DataResponse { data: fields }))
}
