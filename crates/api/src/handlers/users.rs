//! Handlers for the `/users` resource and the per-user listings under it.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use persona_core::error::CoreError;
use persona_core::image_url::image_url;
use persona_core::types::DbId;
use persona_core::validation::require_non_blank;
use persona_db::models::rank::{FieldRank, TagRank};
use persona_db::models::user::{UpdateUser, User};
use persona_db::repositories::{CharacterRepo, ChatRoomRepo, RankRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::handlers::characters::{render_characters, CharacterResponse};
use crate::handlers::chat_rooms::RoomListingResponse;
use crate::handlers::uploads::{discard_stored, Upload};
use crate::middleware::auth::AuthUser;
use crate::request_host::BaseUrl;
use crate::response::DataResponse;
use crate::state::AppState;

/// Entries returned by each rank endpoint.
const RANK_LIMIT: i64 = 3;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `PUT /users/{id}`. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub nickname: Option<String>,
    pub password: Option<String>,
    pub profile_image: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CharacterRankResponse {
    pub character_id: DbId,
    pub name: String,
    pub log_count: i64,
    pub image_url: Option<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Account mutations are limited to the account holder.
fn ensure_self(auth: &AuthUser, id: DbId) -> AppResult<()> {
    if auth.user_id != id {
        return Err(AppError::Core(CoreError::Forbidden(
            "Cannot modify another user's account".into(),
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<User>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("User", id))?;
    Ok(Json(DataResponse { data: user }))
}

/// PUT /api/v1/users/{id}
pub async fn update_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<User>>> {
    ensure_self(&auth, id)?;

    if let Some(nickname) = &input.nickname {
        require_non_blank("nickname", nickname)?;
    }
    let password_hash = match &input.password {
        Some(password) => {
            require_non_blank("password", password)?;
            Some(
                hash_password(password)
                    .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?,
            )
        }
        None => None,
    };

    let update = UpdateUser {
        nickname: input.nickname,
        password_hash,
        profile_image: input.profile_image,
    };
    let user = UserRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| CoreError::not_found("User", id))?;

    tracing::info!(user_id = id, "User updated");
    Ok(Json(DataResponse { data: user }))
}

/// DELETE /api/v1/users/{id}
///
/// Deactivates the account; rows referencing it are kept.
pub async fn delete_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_self(&auth, id)?;

    if !UserRepo::deactivate(&state.pool, id).await? {
        return Err(CoreError::not_found("User", id).into());
    }
    tracing::info!(user_id = id, "User deactivated");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/users/{id}/profile-image
///
/// Multipart form with a `profile_image` file part.
pub async fn upload_profile_image(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    mut multipart: Multipart,
) -> AppResult<Json<DataResponse<User>>> {
    ensure_self(&auth, id)?;

    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await?
    {
        if field.name() == Some("profile_image") {
            upload = Some(Upload::from_field(field, "profile.png").await?);
        }
    }
    let upload =
        upload.ok_or_else(|| AppError::BadRequest("Missing required 'profile_image' field".into()))?;

    if UserRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(CoreError::not_found("User", id).into());
    }
    let path = upload.save_image(&state.config.profile_upload_dir).await?;

    let update = UpdateUser {
        profile_image: Some(path.clone()),
        ..Default::default()
    };
    let user = match UserRepo::update(&state.pool, id, &update).await {
        Ok(Some(user)) => user,
        Ok(None) => {
            discard_stored(Some(&path)).await;
            return Err(CoreError::not_found("User", id).into());
        }
        Err(err) => {
            discard_stored(Some(&path)).await;
            return Err(err.into());
        }
    };

    tracing::info!(user_id = id, "Profile image stored");
    Ok(Json(DataResponse { data: user }))
}

// ---------------------------------------------------------------------------
// Per-user listings
// ---------------------------------------------------------------------------

/// GET /api/v1/users/{id}/characters
pub async fn list_owned_characters(
    State(state): State<AppState>,
    base_url: BaseUrl,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<CharacterResponse>>>> {
    let views = CharacterRepo::list_views_by_owner(&state.pool, id).await?;
    let characters = render_characters(&state.pool, &base_url, views).await?;
    Ok(Json(DataResponse { data: characters }))
}

/// GET /api/v1/users/{id}/following
pub async fn list_followed_characters(
    State(state): State<AppState>,
    base_url: BaseUrl,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<CharacterResponse>>>> {
    let views = CharacterRepo::list_views_followed_by(&state.pool, id).await?;
    let characters = render_characters(&state.pool, &base_url, views).await?;
    Ok(Json(DataResponse { data: characters }))
}

/// GET /api/v1/users/{id}/chat-rooms
pub async fn list_user_chat_rooms(
    State(state): State<AppState>,
    base_url: BaseUrl,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<RoomListingResponse>>>> {
    let rooms = ChatRoomRepo::list_by_user(&state.pool, id)
        .await?
        .into_iter()
        .map(|room| RoomListingResponse::from_listing(room, base_url.as_str()))
        .collect();
    Ok(Json(DataResponse { data: rooms }))
}

// ---------------------------------------------------------------------------
// Rankings
// ---------------------------------------------------------------------------

/// GET /api/v1/users/{id}/rank/characters
///
/// Owned characters with the most chat logs. Characters nobody has chatted
/// with are not ranked.
pub async fn rank_characters(
    State(state): State<AppState>,
    base_url: BaseUrl,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<CharacterRankResponse>>>> {
    let ranks = RankRepo::top_characters(&state.pool, id, RANK_LIMIT)
        .await?
        .into_iter()
        .map(|rank| CharacterRankResponse {
            image_url: image_url(base_url.as_str(), rank.image_path.as_deref()),
            character_id: rank.character_id,
            name: rank.name,
            log_count: rank.log_count,
        })
        .collect();
    Ok(Json(DataResponse { data: ranks }))
}

/// GET /api/v1/users/{id}/rank/fields
pub async fn rank_fields(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<FieldRank>>>> {
    let ranks = RankRepo::top_fields(&state.pool, id, RANK_LIMIT).await?;
    Ok(Json(DataResponse { data: ranks }))
}

/// GET /api/v1/users/{id}/rank/tags
pub async fn rank_tags(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<TagRank>>>> {
    let ranks = RankRepo::top_tags(&state.pool, id, RANK_LIMIT).await?;
    Ok(Json(DataResponse { data: ranks }))
}
