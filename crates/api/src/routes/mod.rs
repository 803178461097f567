pub mod auth;
pub mod characters;
pub mod chat_rooms;
pub mod follows;
pub mod health;
pub mod users;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                          signup
/// /auth/signin                          signin
/// /auth/verify                          verify token (requires auth)
///
/// /users/{id}                           get, update, deactivate
/// /users/{id}/profile-image             upload profile image (POST)
/// /users/{id}/characters                owned characters
/// /users/{id}/following                 followed characters
/// /users/{id}/chat-rooms                active rooms
/// /users/{id}/rank/{characters,fields,tags}   top 3 rankings
///
/// /follows                              follow (POST)
/// /follows/{user_id}/{character_id}     status, unfollow
///
/// /characters                           list, create (multipart)
/// /characters/search                    name/description search
/// /characters/{id}                      get, update (multipart), delete
///
/// /fields                               list categories
/// /tags                                 distinct active tag names
///
/// /chat-rooms                           list, create-or-return
/// /chat-rooms/{room_id}                 detail, deactivate
/// /chat-rooms/{room_id}/messages        chat turn (POST)
/// /chat-rooms/{room_id}/logs            list, record
///
/// /images/generate                      text-to-image proxy (POST)
/// ```
pub fn api_routes(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router(upload_limit))
        .nest("/follows", follows::router())
        .nest("/characters", characters::router(upload_limit))
        .nest("/chat-rooms", chat_rooms::router())
        .route("/fields", get(handlers::fields::list_fields))
        .route("/tags", get(handlers::tags::list_tag_names))
        .route("/images/generate", post(handlers::images::generate_image))
}
