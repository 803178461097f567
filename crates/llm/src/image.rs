//! HTTP client for the text-to-image server.
//!
//! Wraps `POST {base}/generate` using [`reqwest`]. The server answers with a
//! base64-encoded PNG.

use serde::{Deserialize, Serialize};

/// HTTP client for the image generation server.
#[derive(Debug, Clone)]
pub struct ImageGenApi {
    client: reqwest::Client,
    api_url: String,
}

/// Body of `POST /generate`.
#[derive(Debug, Clone, Serialize)]
pub struct ImageGenRequest {
    pub prompt: String,
    pub negative_prompt: String,
    pub width: u32,
    pub height: u32,
    pub guidance_scale: f32,
    pub num_inference_steps: u32,
}

/// Successful response from `POST /generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct ImageGenResponse {
    /// Base64-encoded PNG.
    pub image: String,
}

/// Errors from the image generation HTTP layer.
#[derive(Debug, thiserror::Error)]
pub enum ImageGenError {
    /// The HTTP request itself failed (network, DNS, TLS, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server returned a non-2xx status code.
    #[error("Image generation API error ({status}): {body}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl ImageGenApi {
    /// * `api_url` - Base HTTP URL, e.g. `http://host:8002`.
    pub fn new(api_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
        }
    }

    /// Base HTTP URL.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Generate one image.
    pub async fn generate(
        &self,
        request: &ImageGenRequest,
    ) -> Result<ImageGenResponse, ImageGenError> {
        let response = self
            .client
            .post(format!("{}/generate", self.api_url.trim_end_matches('/')))
            .json(request)
            .send()
            .await?;

        let response = Self::ensure_success(response).await?;
        Ok(response.json::<ImageGenResponse>().await?)
    }

    /// Return the response unchanged on success, or an
    /// [`ImageGenError::ApiError`] carrying the status and body text.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, ImageGenError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ImageGenError::ApiError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}
