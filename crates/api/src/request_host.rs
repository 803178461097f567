//! Extractor for the externally visible base URL of the current request.
//!
//! Image URLs in responses are built against whatever host the client used,
//! so a deployment behind a proxy works without extra configuration.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::header::HOST;
use axum::http::request::Parts;
use persona_core::image_url::base_url;

const FORWARDED_PROTO: &str = "x-forwarded-proto";
const FALLBACK_HOST: &str = "localhost";

/// `{scheme}://{host}` taken from `X-Forwarded-Proto` and `Host`.
#[derive(Debug, Clone)]
pub struct BaseUrl(pub String);

impl BaseUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for BaseUrl {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let scheme = parts
            .headers
            .get(FORWARDED_PROTO)
            .and_then(|v| v.to_str().ok());
        let host = parts
            .headers
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .or_else(|| parts.uri.authority().map(|a| a.as_str()))
            .unwrap_or(FALLBACK_HOST);

        Ok(BaseUrl(base_url(scheme, host)))
    }
}
