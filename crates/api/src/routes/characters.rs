//! Route definitions for the `/characters` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::get;
use axum::Router;

use crate::handlers::characters;
use crate::state::AppState;

/// Routes mounted at `/characters`.
///
/// ```text
/// GET    /              -> list_characters
/// POST   /              -> create_character (multipart)
/// GET    /search        -> search_characters
/// GET    /{id}          -> get_character
/// PUT    /{id}          -> update_character (multipart)
/// DELETE /{id}          -> delete_character
/// ```
///
/// `upload_limit` caps multipart bodies on create and update.
pub fn router(upload_limit: usize) -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(characters::list_characters).post(characters::create_character),
        )
        .route("/search", get(characters::search_characters))
        .route(
            "/{id}",
            get(characters::get_character)
                .put(characters::update_character)
                .delete(characters::delete_character),
        )
        .layer(DefaultBodyLimit::max(upload_limit))
}
