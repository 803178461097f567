//! Route definitions for the `/users` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// Routes mounted at `/users`.
///
/// ```text
/// GET    /{id}                   -> get_user
/// PUT    /{id}                   -> update_user (requires auth, self only)
/// DELETE /{id}                   -> delete_user (requires auth, self only)
/// POST   /{id}/profile-image     -> upload_profile_image (requires auth, self only)
/// GET    /{id}/characters        -> list_owned_characters
/// GET    /{id}/following         -> list_followed_characters
/// GET    /{id}/chat-rooms        -> list_user_chat_rooms
/// GET    /{id}/rank/characters   -> rank_characters
/// GET    /{id}/rank/fields       -> rank_fields
/// GET    /{id}/rank/tags         -> rank_tags
/// ```
pub fn router(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route(
            "/{id}/profile-image",
            post(users::upload_profile_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/{id}/characters", get(users::list_owned_characters))
        .route("/{id}/following", get(users::list_followed_characters))
        .route("/{id}/chat-rooms", get(users::list_user_chat_rooms))
        .route("/{id}/rank/characters", get(users::rank_characters))
        .route("/{id}/rank/fields", get(users::rank_fields))
        .route("/{id}/rank/tags", get(users::rank_tags))
}
