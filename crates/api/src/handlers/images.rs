//! Handler proxying prompt requests to the text-to-image service.

use axum::extract::State;
use axum::Json;
use persona_core::error::CoreError;
use persona_core::image_prompt::{assemble_prompt, NEGATIVE_PROMPT};
use persona_core::validation::validate_input;
use persona_llm::image::ImageGenRequest;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /images/generate`.
#[derive(Debug, Deserialize, Validate)]
pub struct GenerateImageRequest {
    #[validate(length(min = 1, message = "prompt must not be empty"))]
    pub prompt: String,
    pub art_style: String,
    pub background: String,
    pub mood: String,
    #[validate(range(min = 64, max = 2048))]
    pub width: u32,
    #[validate(range(min = 64, max = 2048))]
    pub height: u32,
    pub guidance_scale: f32,
    #[validate(range(min = 1, max = 200))]
    pub num_inference_steps: u32,
}

#[derive(Debug, Serialize)]
pub struct GenerateImageResponse {
    /// Base64-encoded PNG.
    pub image: String,
    /// The full prompt sent to the service.
    pub prompt: String,
}

/// POST /api/v1/images/generate
pub async fn generate_image(
    State(state): State<AppState>,
    Json(input): Json<GenerateImageRequest>,
) -> AppResult<Json<DataResponse<GenerateImageResponse>>> {
    validate_input(&input)?;
    if !input.guidance_scale.is_finite() || input.guidance_scale <= 0.0 {
        return Err(CoreError::Validation("guidance_scale must be positive".into()).into());
    }

    let prompt = assemble_prompt(&input.prompt, &input.art_style, &input.background, &input.mood);
    let request = ImageGenRequest {
        prompt: prompt.clone(),
        negative_prompt: NEGATIVE_PROMPT.to_string(),
        width: input.width,
        height: input.height,
        guidance_scale: input.guidance_scale,
        num_inference_steps: input.num_inference_steps,
    };

    tracing::info!(width = input.width, height = input.height, "Requesting image generation");
    let generated = state.image_api.generate(&request).await?;

    Ok(Json(DataResponse {
        data: GenerateImageResponse {
            image: generated.image,
            prompt,
        },
    }))
}
