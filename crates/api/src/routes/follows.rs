//! Route definitions for the `/follows` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::follows;
use crate::state::AppState;

/// Routes mounted at `/follows`.
///
/// ```text
/// POST   /                           -> follow
/// GET    /{user_id}/{character_id}   -> follow_status
/// DELETE /{user_id}/{character_id}   -> unfollow
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(follows::follow)).route(
        "/{user_id}/{character_id}",
        get(follows::follow_status).delete(follows::unfollow),
    )
}
