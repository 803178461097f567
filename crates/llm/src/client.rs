//! WebSocket client for the chat generation server.
//!
//! [`GenerationClient`] holds only immutable configuration. Each call to
//! [`GenerationClient::generate`] opens a fresh connection addressed by the
//! room id, sends one request frame, waits for one reply frame, and closes.
//! Nothing is retried.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use persona_core::types::RoomId;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{self, error::ProtocolError, Message};

use crate::messages::{parse_reply, GenerationReply, GenerationRequest};

/// Configuration handle for the generation server.
#[derive(Debug, Clone)]
pub struct GenerationClient {
    ws_url: String,
    timeout: Duration,
}

/// Build the per-room endpoint, e.g. `ws://host:8001/ws/generate/?room_id=<uuid>`.
pub fn generation_url(ws_url: &str, room_id: RoomId) -> String {
    format!("{}/ws/generate/?room_id={room_id}", ws_url.trim_end_matches('/'))
}

impl GenerationClient {
    /// * `ws_url`  - WebSocket base URL, e.g. `ws://host:8001`.
    /// * `timeout` - bound on connect plus reply for one turn.
    pub fn new(ws_url: String, timeout: Duration) -> Self {
        Self { ws_url, timeout }
    }

    /// WebSocket base URL.
    pub fn ws_url(&self) -> &str {
        &self.ws_url
    }

    /// Run one request/reply exchange for `room_id`.
    pub async fn generate(
        &self,
        room_id: RoomId,
        request: &GenerationRequest,
    ) -> Result<GenerationReply, GenerationError> {
        let url = generation_url(&self.ws_url, room_id);
        let payload = serde_json::to_string(request)
            .map_err(|e| GenerationError::Transport(format!("Failed to encode request: {e}")))?;

        let started = std::time::Instant::now();
        let reply = tokio::time::timeout(
            self.timeout,
            exchange(&url, payload, request.favorability),
        )
        .await
        .map_err(|_| GenerationError::Timeout(self.timeout))??;

        tracing::debug!(
            room_id = %room_id,
            emotion = %reply.emotion,
            favorability = reply.favorability,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Generation reply received",
        );
        Ok(reply)
    }
}

async fn exchange(
    url: &str,
    payload: String,
    sent_favorability: i32,
) -> Result<GenerationReply, GenerationError> {
    let (mut ws_stream, _response) = connect_async(url).await?;
    ws_stream.send(Message::Text(payload)).await?;

    while let Some(frame) = ws_stream.next().await {
        match frame? {
            Message::Text(text) => {
                let reply = parse_reply(&text, sent_favorability)
                    .map_err(|e| GenerationError::Transport(format!("Malformed reply: {e}")))?;
                // Reply already in hand; a failed close handshake changes nothing.
                let _ = ws_stream.close(None).await;
                return Ok(reply);
            }
            Message::Close(frame) => {
                return Err(GenerationError::ConnectionClosed(format!(
                    "Server closed before replying: {frame:?}"
                )));
            }
            Message::Binary(_) => {
                return Err(GenerationError::Transport(
                    "Unexpected binary frame".to_string(),
                ));
            }
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => {}
        }
    }

    Err(GenerationError::ConnectionClosed(
        "Stream ended before a reply arrived".to_string(),
    ))
}

/// Failures of one generation round trip.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    /// Connect plus reply took longer than the configured bound.
    #[error("Generation timed out after {0:?}")]
    Timeout(Duration),

    /// The server closed the connection, cleanly or not, before replying.
    #[error("Generation connection closed: {0}")]
    ConnectionClosed(String),

    /// Any other socket, protocol, or payload failure.
    #[error("Generation transport error: {0}")]
    Transport(String),
}

impl From<tungstenite::Error> for GenerationError {
    fn from(err: tungstenite::Error) -> Self {
        match err {
            tungstenite::Error::ConnectionClosed
            | tungstenite::Error::AlreadyClosed
            | tungstenite::Error::Protocol(ProtocolError::ResetWithoutClosingHandshake) => {
                Self::ConnectionClosed(err.to_string())
            }
            other => Self::Transport(other.to_string()),
        }
    }
}
