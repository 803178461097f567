//! Route definitions for the `/chat-rooms` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::chat_rooms;
use crate::state::AppState;

/// Routes mounted at `/chat-rooms`.
///
/// ```text
/// GET    /                      -> list_rooms
/// POST   /                      -> create_room
/// GET    /{room_id}             -> get_room
/// DELETE /{room_id}             -> delete_room
/// POST   /{room_id}/messages    -> send_message
/// GET    /{room_id}/logs        -> list_logs
/// POST   /{room_id}/logs        -> create_log
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(chat_rooms::list_rooms).post(chat_rooms::create_room),
        )
        .route(
            "/{room_id}",
            get(chat_rooms::get_room).delete(chat_rooms::delete_room),
        )
        .route("/{room_id}/messages", post(chat_rooms::send_message))
        .route(
            "/{room_id}/logs",
            get(chat_rooms::list_logs).post(chat_rooms::create_log),
        )
}
