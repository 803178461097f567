//! Handlers for the `/characters` resource.
//!
//! Create and update take a multipart form with a `character_data` JSON part
//! and an optional `character_image` file part. Every write appends a new
//! prompt version; earlier versions stay bound to the rooms created on them.

use std::collections::HashMap;

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use persona_core::character::CharacterPayload;
use persona_core::error::CoreError;
use persona_core::image_url::image_url;
use persona_core::persona::{
    default_honorifics, parse_dialogues, parse_honorifics, serialize_dialogues,
    serialize_honorifics, DialogueLine, Honorifics,
};
use persona_core::types::DbId;
use persona_core::validation::require_non_blank;
use persona_db::models::character::{CharacterFields, CharacterSummary, CharacterView, CreatePrompt};
use persona_db::models::tag::{CreateTag, Tag};
use persona_db::repositories::{CharacterRepo, FieldRepo, TagRepo, UserRepo};
use persona_db::DbPool;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::handlers::uploads::{discard_stored, Upload};
use crate::request_host::BaseUrl;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Query parameters for `GET /characters/search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub query: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TagResponse {
    pub name: String,
    pub description: String,
}

/// A character with its current prompt, as returned by every read endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct CharacterResponse {
    pub id: DbId,
    pub owner_id: DbId,
    pub field_id: DbId,
    pub voice_id: Option<String>,
    pub name: String,
    pub description: String,
    pub honorifics: Honorifics,
    pub prompt_id: DbId,
    pub prompt_version: i32,
    pub appearance: String,
    pub personality: String,
    pub background: String,
    pub speech_style: String,
    pub example_dialogues: Vec<DialogueLine>,
    pub tags: Vec<TagResponse>,
    pub image_url: Option<String>,
    pub follower_count: i64,
    pub created_at: DateTime<Utc>,
}

impl CharacterResponse {
    fn from_view(view: CharacterView, tags: Vec<TagResponse>, base_url: &str) -> Self {
        Self {
            image_url: image_url(base_url, view.image_path.as_deref()),
            honorifics: parse_honorifics(view.honorifics.as_deref()),
            example_dialogues: parse_dialogues(view.example_dialogues.as_deref()),
            id: view.id,
            owner_id: view.owner_id,
            field_id: view.field_id,
            voice_id: view.voice_id,
            name: view.name,
            description: view.description,
            prompt_id: view.prompt_id,
            prompt_version: view.prompt_version,
            appearance: view.appearance,
            personality: view.personality,
            background: view.background,
            speech_style: view.speech_style,
            tags,
            follower_count: view.follower_count,
            created_at: view.created_at,
        }
    }
}

/// Attach active tags and image URLs to a batch of views, preserving order.
pub async fn render_characters(
    pool: &DbPool,
    base_url: &BaseUrl,
    views: Vec<CharacterView>,
) -> AppResult<Vec<CharacterResponse>> {
    let ids: Vec<DbId> = views.iter().map(|v| v.id).collect();
    let mut tags_by_character: HashMap<DbId, Vec<TagResponse>> = HashMap::new();
    for Tag {
        character_id,
        name,
        description,
        ..
    } in TagRepo::list_active_for_characters(pool, &ids).await?
    {
        tags_by_character
            .entry(character_id)
            .or_default()
            .push(TagResponse { name, description });
    }

    Ok(views
        .into_iter()
        .map(|view| {
            let tags = tags_by_character.remove(&view.id).unwrap_or_default();
            CharacterResponse::from_view(view, tags, base_url.as_str())
        })
        .collect())
}

async fn render_one(pool: &DbPool, base_url: &BaseUrl, id: DbId) -> AppResult<CharacterResponse> {
    let view = CharacterRepo::find_view(pool, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Character", id))?;
    render_characters(pool, base_url, vec![view])
        .await?
        .pop()
        .ok_or_else(|| AppError::InternalError(format!("Character {id} vanished while rendering")))
}

// ---------------------------------------------------------------------------
// Multipart form
// ---------------------------------------------------------------------------

struct CharacterForm {
    payload: CharacterPayload,
    image: Option<Upload>,
}

async fn read_character_form(mut multipart: Multipart) -> AppResult<CharacterForm> {
    let mut payload = None;
    let mut image = None;

    while let Some(field) = multipart
        .next_field()
        .await?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "character_data" => {
                let text = field.text().await?;
                payload = Some(CharacterPayload::from_json(&text)?);
            }
            "character_image" => {
                let upload = Upload::from_field(field, "character.png").await?;
                if !upload.data.is_empty() {
                    image = Some(upload);
                }
            }
            _ => {} // ignore unknown fields
        }
    }

    let payload = payload
        .ok_or_else(|| AppError::BadRequest("Missing required 'character_data' field".into()))?;
    Ok(CharacterForm { payload, image })
}

/// Split a validated payload into the row groups the repository writes.
fn into_rows(payload: CharacterPayload) -> (CharacterFields, CreatePrompt, Option<Vec<CreateTag>>) {
    let honorifics = payload.honorifics.unwrap_or_else(default_honorifics);
    let fields = CharacterFields {
        owner_id: payload.owner_id,
        field_id: payload.field_id,
        voice_id: payload.voice_id,
        name: payload.name,
        description: payload.description,
        honorifics: serialize_honorifics(&honorifics),
    };
    let prompt = CreatePrompt {
        appearance: payload.appearance,
        personality: payload.personality,
        background: payload.background,
        speech_style: payload.speech_style,
        example_dialogues: serialize_dialogues(&payload.example_dialogues),
    };
    let tags = payload.tags.map(|tags| {
        tags.into_iter()
            .map(|t| CreateTag {
                name: t.name,
                description: t.description,
            })
            .collect()
    });
    (fields, prompt, tags)
}

/// Owner and field must exist before any row is written.
async fn ensure_references(pool: &DbPool, fields: &CharacterFields) -> AppResult<()> {
    if UserRepo::find_by_id(pool, fields.owner_id).await?.is_none() {
        return Err(CoreError::not_found("User", fields.owner_id).into());
    }
    if FieldRepo::find_by_id(pool, fields.field_id).await?.is_none() {
        return Err(CoreError::not_found("Field", fields.field_id).into());
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/characters
pub async fn create_character(
    State(state): State<AppState>,
    base_url: BaseUrl,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<CharacterResponse>>)> {
    let form = read_character_form(multipart).await?;
    let (fields, prompt, tags) = into_rows(form.payload);
    ensure_references(&state.pool, &fields).await?;

    let image_path = match &form.image {
        Some(upload) => Some(upload.save_image(&state.config.upload_dir).await?),
        None => None,
    };

    let created = CharacterRepo::create(
        &state.pool,
        &fields,
        &prompt,
        image_path.as_deref(),
        tags.as_deref().unwrap_or_default(),
    )
    .await;
    let id = match created {
        Ok(id) => id,
        Err(err) => {
            discard_stored(image_path.as_deref()).await;
            return Err(err.into());
        }
    };

    tracing::info!(character_id = id, owner_id = fields.owner_id, "Character created");

    let character = render_one(&state.pool, &base_url, id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: character })))
}

/// GET /api/v1/characters
pub async fn list_characters(
    State(state): State<AppState>,
    base_url: BaseUrl,
) -> AppResult<Json<DataResponse<Vec<CharacterResponse>>>> {
    let views = CharacterRepo::list_views(&state.pool).await?;
    let characters = render_characters(&state.pool, &base_url, views).await?;
    Ok(Json(DataResponse { data: characters }))
}

/// GET /api/v1/characters/search?query=
///
/// Substring match on name or description. No match is a 404.
pub async fn search_characters(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<DataResponse<Vec<CharacterSummary>>>> {
    require_non_blank("query", &params.query)?;

    let results = CharacterRepo::search(&state.pool, &params.query).await?;
    if results.is_empty() {
        return Err(CoreError::not_found("Character matching", &params.query).into());
    }
    Ok(Json(DataResponse { data: results }))
}

/// GET /api/v1/characters/{id}
pub async fn get_character(
    State(state): State<AppState>,
    base_url: BaseUrl,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CharacterResponse>>> {
    let character = render_one(&state.pool, &base_url, id).await?;
    Ok(Json(DataResponse { data: character }))
}

/// PUT /api/v1/characters/{id}
///
/// Replaces the character columns and appends a prompt version. A new image
/// supersedes the previous one; `tags`, when present, replaces the active set.
pub async fn update_character(
    State(state): State<AppState>,
    base_url: BaseUrl,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<DataResponse<CharacterResponse>>> {
    if CharacterRepo::find_by_id(&state.pool, id).await?.is_none() {
        return Err(CoreError::not_found("Character", id).into());
    }

    let form = read_character_form(multipart).await?;
    let (fields, prompt, tags) = into_rows(form.payload);
    ensure_references(&state.pool, &fields).await?;

    let image_path = match &form.image {
        Some(upload) => Some(upload.save_image(&state.config.upload_dir).await?),
        None => None,
    };

    let updated = CharacterRepo::update(
        &state.pool,
        id,
        &fields,
        &prompt,
        image_path.as_deref(),
        tags.as_deref(),
    )
    .await;
    match updated {
        Ok(true) => {}
        Ok(false) => {
            discard_stored(image_path.as_deref()).await;
            return Err(CoreError::not_found("Character", id).into());
        }
        Err(err) => {
            discard_stored(image_path.as_deref()).await;
            return Err(err.into());
        }
    }

    tracing::info!(character_id = id, "Character updated");

    let character = render_one(&state.pool, &base_url, id).await?;
    Ok(Json(DataResponse { data: character }))
}

/// DELETE /api/v1/characters/{id}
pub async fn delete_character(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !CharacterRepo::soft_delete(&state.pool, id).await? {
        return Err(CoreError::not_found("Character", id).into());
    }
    tracing::info!(character_id = id, "Character deactivated");
    Ok(StatusCode::NO_CONTENT)
}
