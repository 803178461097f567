//! Handlers for the `/chat-rooms` resource: rooms, chat turns, and logs.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use persona_core::error::CoreError;
use persona_core::image_url::image_url;
use persona_core::persona::{parse_dialogues, parse_honorifics, DialogueLine, Honorifics};
use persona_core::types::{DbId, RoomId};
use persona_core::validation::require_non_blank;
use persona_db::models::chat_log::{ChatLog, CreateChatLog};
use persona_db::models::chat_room::{CreateChatRoom, RoomContext, RoomListing};
use persona_db::repositories::{ChatLogRepo, ChatRoomRepo, UserRepo};
use serde::{Deserialize, Serialize};

use crate::chat::turn::{ChatTurnOrchestrator, TurnOutcome};
use crate::error::AppResult;
use crate::request_host::BaseUrl;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /chat-rooms/{room_id}/messages`.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub message: String,
}

/// Result of `POST /chat-rooms`.
#[derive(Debug, Serialize)]
pub struct CreateRoomResponse {
    pub room_id: RoomId,
    pub user_id: DbId,
    pub character_id: DbId,
    pub favorability: i32,
    pub user_display_name: String,
    pub user_introduction: String,
    pub created_at: DateTime<Utc>,
    /// `true` when an active room for this user and persona already existed.
    pub chat_exists: bool,
}

/// Room row in list endpoints.
#[derive(Debug, Serialize)]
pub struct RoomListingResponse {
    pub room_id: RoomId,
    pub user_id: DbId,
    pub character_id: DbId,
    pub character_name: String,
    pub character_description: String,
    pub appearance: String,
    pub personality: String,
    pub background: String,
    pub speech_style: String,
    pub favorability: i32,
    pub created_at: DateTime<Utc>,
    pub image_url: Option<String>,
}

impl RoomListingResponse {
    pub fn from_listing(listing: RoomListing, base_url: &str) -> Self {
        Self {
            image_url: image_url(base_url, listing.image_path.as_deref()),
            room_id: listing.room_id,
            user_id: listing.user_id,
            character_id: listing.character_id,
            character_name: listing.character_name,
            character_description: listing.character_description,
            appearance: listing.appearance,
            personality: listing.personality,
            background: listing.background,
            speech_style: listing.speech_style,
            favorability: listing.favorability,
            created_at: listing.room_created_at,
        }
    }
}

/// Full room detail including the persona snapshot it is bound to.
#[derive(Debug, Serialize)]
pub struct RoomDetailResponse {
    pub room_id: RoomId,
    pub user_id: DbId,
    pub favorability: i32,
    pub user_display_name: String,
    pub user_introduction: String,
    pub created_at: DateTime<Utc>,
    pub character_id: DbId,
    pub character_name: String,
    pub character_description: String,
    pub honorifics: Honorifics,
    pub prompt_id: DbId,
    pub appearance: String,
    pub personality: String,
    pub background: String,
    pub speech_style: String,
    pub example_dialogues: Vec<DialogueLine>,
}

impl From<RoomContext> for RoomDetailResponse {
    fn from(ctx: RoomContext) -> Self {
        Self {
            honorifics: parse_honorifics(ctx.honorifics.as_deref()),
            example_dialogues: parse_dialogues(ctx.example_dialogues.as_deref()),
            room_id: ctx.room_id,
            user_id: ctx.user_id,
            favorability: ctx.favorability,
            user_display_name: ctx.user_display_name,
            user_introduction: ctx.user_introduction,
            created_at: ctx.room_created_at,
            character_id: ctx.character_id,
            character_name: ctx.character_name,
            character_description: ctx.character_description,
            prompt_id: ctx.prompt_id,
            appearance: ctx.appearance,
            personality: ctx.personality,
            background: ctx.background,
            speech_style: ctx.speech_style,
        }
    }
}

// ---------------------------------------------------------------------------
// Rooms
// ---------------------------------------------------------------------------

/// POST /api/v1/chat-rooms
///
/// Returns the caller's active room for the character's current persona,
/// creating it if needed. 201 when created, 200 with `chat_exists` otherwise.
/// Unknown or deactivated users are a 404.
pub async fn create_room(
    State(state): State<AppState>,
    Json(input): Json<CreateChatRoom>,
) -> AppResult<(StatusCode, Json<DataResponse<CreateRoomResponse>>)> {
    if UserRepo::find_by_id(&state.pool, input.user_id).await?.is_none() {
        return Err(CoreError::not_found("User", input.user_id).into());
    }
    let lookup = ChatRoomRepo::find_or_create(&state.pool, &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Character", input.character_id))?;

    let status = if lookup.existed {
        StatusCode::OK
    } else {
        tracing::info!(
            room_id = %lookup.room.id,
            user_id = input.user_id,
            character_id = input.character_id,
            "Chat room created",
        );
        StatusCode::CREATED
    };

    let room = lookup.room;
    Ok((
        status,
        Json(DataResponse {
            data: CreateRoomResponse {
                room_id: room.id,
                user_id: room.user_id,
                character_id: lookup.character_id,
                favorability: room.favorability,
                user_display_name: room.user_display_name,
                user_introduction: room.user_introduction,
                created_at: room.created_at,
                chat_exists: lookup.existed,
            },
        }),
    ))
}

/// GET /api/v1/chat-rooms
pub async fn list_rooms(
    State(state): State<AppState>,
    base_url: BaseUrl,
) -> AppResult<Json<DataResponse<Vec<RoomListingResponse>>>> {
    let rooms = ChatRoomRepo::list(&state.pool)
        .await?
        .into_iter()
        .map(|room| RoomListingResponse::from_listing(room, base_url.as_str()))
        .collect();
    Ok(Json(DataResponse { data: rooms }))
}

/// GET /api/v1/chat-rooms/{room_id}
pub async fn get_room(
    State(state): State<AppState>,
    Path(room_id): Path<RoomId>,
) -> AppResult<Json<DataResponse<RoomDetailResponse>>> {
    let context = ChatRoomRepo::find_context(&state.pool, room_id)
        .await?
        .ok_or_else(|| CoreError::not_found("ChatRoom", room_id))?;
    Ok(Json(DataResponse {
        data: context.into(),
    }))
}

/// DELETE /api/v1/chat-rooms/{room_id}
pub async fn delete_room(
    State(state): State<AppState>,
    Path(room_id): Path<RoomId>,
) -> AppResult<StatusCode> {
    if !ChatRoomRepo::deactivate(&state.pool, room_id).await? {
        return Err(CoreError::not_found("ChatRoom", room_id).into());
    }
    tracing::info!(%room_id, "Chat room deactivated");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Turns
// ---------------------------------------------------------------------------

/// POST /api/v1/chat-rooms/{room_id}/messages
pub async fn send_message(
    State(state): State<AppState>,
    Path(room_id): Path<RoomId>,
    Json(input): Json<SendMessageRequest>,
) -> AppResult<Json<DataResponse<TurnOutcome>>> {
    require_non_blank("message", &input.message)?;

    let orchestrator = ChatTurnOrchestrator::new(state.pool.clone(), state.generation.clone());
    let outcome = orchestrator.run(room_id, &input.message).await?;
    Ok(Json(DataResponse { data: outcome }))
}

// ---------------------------------------------------------------------------
// Logs
// ---------------------------------------------------------------------------

/// GET /api/v1/chat-rooms/{room_id}/logs
pub async fn list_logs(
    State(state): State<AppState>,
    Path(room_id): Path<RoomId>,
) -> AppResult<Json<DataResponse<Vec<ChatLog>>>> {
    if ChatRoomRepo::find_by_id(&state.pool, room_id).await?.is_none() {
        return Err(CoreError::not_found("ChatRoom", room_id).into());
    }
    let logs = ChatLogRepo::list_by_room(&state.pool, room_id).await?;
    Ok(Json(DataResponse { data: logs }))
}

/// POST /api/v1/chat-rooms/{room_id}/logs
pub async fn create_log(
    State(state): State<AppState>,
    Path(room_id): Path<RoomId>,
    Json(input): Json<CreateChatLog>,
) -> AppResult<(StatusCode, Json<DataResponse<ChatLog>>)> {
    if input.end_time < input.start_time {
        return Err(CoreError::Validation("end_time must not precede start_time".into()).into());
    }
    if ChatRoomRepo::find_by_id(&state.pool, room_id).await?.is_none() {
        return Err(CoreError::not_found("ChatRoom", room_id).into());
    }

    let log = ChatLogRepo::create(&state.pool, room_id, &input).await?;
    tracing::debug!(%room_id, log_id = log.id, "Chat log recorded");
    Ok((StatusCode::CREATED, Json(DataResponse { data: log })))
}
