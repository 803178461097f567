//! Handlers for follow edges between users and characters.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use persona_core::error::CoreError;
use persona_core::types::DbId;
use persona_db::models::friend::{CreateFollow, Friend};
use persona_db::repositories::{CharacterRepo, FriendRepo, UserRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FollowStatus {
    pub is_following: bool,
}

/// POST /api/v1/follows
///
/// 409 when the edge is already active. A concurrent duplicate is caught by
/// the `uq_friends_active` index and maps to the same status.
pub async fn follow(
    State(state): State<AppState>,
    Json(input): Json<CreateFollow>,
) -> AppResult<(StatusCode, Json<DataResponse<Friend>>)> {
    if UserRepo::find_by_id(&state.pool, input.user_id).await?.is_none() {
        return Err(CoreError::not_found("User", input.user_id).into());
    }
    if CharacterRepo::find_by_id(&state.pool, input.character_id)
        .await?
        .is_none()
    {
        return Err(CoreError::not_found("Character", input.character_id).into());
    }
    if FriendRepo::is_following(&state.pool, input.user_id, input.character_id).await? {
        return Err(CoreError::Conflict(format!(
            "User {} already follows character {}",
            input.user_id, input.character_id
        ))
        .into());
    }

    let edge = FriendRepo::follow(&state.pool, input.user_id, input.character_id).await?;
    tracing::info!(
        user_id = input.user_id,
        character_id = input.character_id,
        "Character followed",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: edge })))
}

/// DELETE /api/v1/follows/{user_id}/{character_id}
pub async fn unfollow(
    State(state): State<AppState>,
    Path((user_id, character_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if !FriendRepo::unfollow(&state.pool, user_id, character_id).await? {
        return Err(CoreError::not_found("Follow", format!("{user_id}/{character_id}")).into());
    }
    tracing::info!(user_id, character_id, "Character unfollowed");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/follows/{user_id}/{character_id}
pub async fn follow_status(
    State(state): State<AppState>,
    Path((user_id, character_id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<FollowStatus>>> {
    let is_following = FriendRepo::is_following(&state.pool, user_id, character_id).await?;
    Ok(Json(DataResponse {
        data: FollowStatus { is_following },
    }))
}
