use std::sync::Arc;

use persona_llm::image::ImageGenApi;
use persona_llm::service::GenerationService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: persona_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Chat generation backend, built once at startup.
    pub generation: Arc<dyn GenerationService>,
    /// Text-to-image HTTP client.
    pub image_api: Arc<ImageGenApi>,
}
