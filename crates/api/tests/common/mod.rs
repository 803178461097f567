#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use persona_api::auth::jwt::JwtConfig;
use persona_api::config::ServerConfig;
use persona_api::router::build_app_router;
use persona_api::state::AppState;
use persona_core::types::RoomId;
use persona_llm::client::GenerationError;
use persona_llm::image::ImageGenApi;
use persona_llm::messages::{GenerationReply, GenerationRequest};
use persona_llm::service::GenerationService;
use sqlx::PgPool;
use tower::ServiceExt;

pub const MULTIPART_BOUNDARY: &str = "persona-test-boundary";

/// Upload cap used by every test app.
pub const TEST_MAX_UPLOAD_BYTES: usize = 4 * 1024 * 1024;

/// Build a test `ServerConfig` with safe defaults and a throwaway upload dir.
pub fn test_config() -> ServerConfig {
    let scratch = std::env::temp_dir().join(format!("persona-api-test-{}", uuid::Uuid::new_v4()));
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        llm_ws_url: "ws://127.0.0.1:9".to_string(),
        llm_timeout_secs: 1,
        // Nothing listens on the discard port; requests fail fast.
        image_gen_url: "http://127.0.0.1:9".to_string(),
        upload_dir: scratch.join("characters").to_string_lossy().into_owned(),
        profile_upload_dir: scratch.join("profiles").to_string_lossy().into_owned(),
        max_upload_bytes: TEST_MAX_UPLOAD_BYTES,
        database_url: String::new(),
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

// ---------------------------------------------------------------------------
// Generation stub
// ---------------------------------------------------------------------------

/// What the stub does on every call.
#[derive(Debug, Clone)]
pub enum StubBehavior {
    /// Reply with this text and emotion; favorability is the sent value plus `delta`.
    Reply {
        text: String,
        emotion: String,
        delta: i32,
    },
    Timeout,
    Closed,
}

/// In-process stand-in for the LLM chat server.
pub struct StubGeneration {
    behavior: StubBehavior,
    calls: AtomicUsize,
    last_history: std::sync::Mutex<Option<String>>,
}

impl StubGeneration {
    pub fn new(behavior: StubBehavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_history: std::sync::Mutex::new(None),
        })
    }

    pub fn replying(text: &str, emotion: &str, delta: i32) -> Arc<Self> {
        Self::new(StubBehavior::Reply {
            text: text.to_string(),
            emotion: emotion.to_string(),
            delta,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_history(&self) -> Option<String> {
        self.last_history.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationService for StubGeneration {
    async fn generate(
        &self,
        _room_id: RoomId,
        request: &GenerationRequest,
    ) -> Result<GenerationReply, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_history.lock().unwrap() = Some(request.chat_history.clone());
        match &self.behavior {
            StubBehavior::Reply {
                text,
                emotion,
                delta,
            } => Ok(GenerationReply {
                text: text.clone(),
                emotion: emotion.clone(),
                favorability: request.favorability + delta,
            }),
            StubBehavior::Timeout => Err(GenerationError::Timeout(Duration::from_secs(1))),
            StubBehavior::Closed => Err(GenerationError::ConnectionClosed(
                "server went away".to_string(),
            )),
        }
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// Build the full application router around the given generation backend.
pub fn build_test_app_with(pool: PgPool, generation: Arc<dyn GenerationService>) -> Router {
    build_test_app_with_config(pool, generation, test_config())
}

/// Build the full application router from an explicit config, for tests
/// that inspect the upload directories.
pub fn build_test_app_with_config(
    pool: PgPool,
    generation: Arc<dyn GenerationService>,
    config: ServerConfig,
) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        generation,
        image_api: Arc::new(ImageGenApi::new(config.image_gen_url.clone())),
    };
    build_app_router(state, &config)
}

/// Build the full application router with a stub that always replies.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with(pool, StubGeneration::replying("Hello there.", "Happy", 5))
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("router is infallible")
}

fn json_request(method: Method, uri: &str, body: serde_json::Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    send(app, json_request(Method::POST, uri, body, None)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: serde_json::Value, token: &str) -> Response {
    send(app, json_request(Method::PUT, uri, body, Some(token))).await
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// One part of a multipart form.
pub enum Part<'a> {
    Text { name: &'a str, value: String },
    File { name: &'a str, filename: &'a str, data: &'a [u8] },
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                filename,
                data,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn send_multipart(
    app: Router,
    method: Method,
    uri: &str,
    parts: &[Part<'_>],
    token: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri).header(
        CONTENT_TYPE,
        format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
    );
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = builder.body(Body::from(multipart_body(parts))).unwrap();
    send(app, request).await
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should collect")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Sign up through the API and return the new user id.
pub async fn signup(pool: &PgPool, login_id: &str, password: &str) -> i64 {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/auth/signup",
        serde_json::json!({"login_id": login_id, "nickname": login_id, "password": password}),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Sign in through the API and return the bearer token.
pub async fn signin(pool: &PgPool, login_id: &str, password: &str) -> String {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/auth/signin",
        serde_json::json!({"login_id": login_id, "password": password}),
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await["data"]["token"]
        .as_str()
        .unwrap()
        .to_string()
}

/// `character_data` JSON for a character owned by `owner_id` in field 1.
pub fn character_data(owner_id: i64, name: &str) -> serde_json::Value {
    serde_json::json!({
        "owner_id": owner_id,
        "field_id": 1,
        "name": name,
        "description": format!("{name} maps uncharted coasts"),
        "appearance": "silver hair",
        "personality": "curious",
        "background": "grew up at sea",
        "speech_style": "formal",
        "example_dialogues": [
            {"speaker": "user", "utterance": "Where to?"},
            {"speaker": name, "utterance": "North, always north."}
        ],
        "tags": [{"name": "fantasy", "description": "high fantasy"}]
    })
}

/// Create a character with a portrait through the multipart endpoint and
/// return its JSON.
pub async fn create_character(pool: &PgPool, owner_id: i64, name: &str) -> serde_json::Value {
    let response = send_multipart(
        build_test_app(pool.clone()),
        Method::POST,
        "/api/v1/characters",
        &[
            Part::Text {
                name: "character_data",
                value: character_data(owner_id, name).to_string(),
            },
            Part::File {
                name: "character_image",
                filename: "portrait.png",
                data: b"\x89PNG fake",
            },
        ],
        None,
    )
    .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Open (or fetch) the room between a user and a character.
pub async fn create_room(pool: &PgPool, user_id: i64, character_id: i64) -> serde_json::Value {
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/chat-rooms",
        serde_json::json!({
            "user_id": user_id,
            "character_id": character_id,
            "user_display_name": "Captain",
            "user_introduction": "I sail the northern seas"
        }),
    )
    .await;
    assert!(response.status().is_success());
    body_json(response).await["data"].clone()
}
