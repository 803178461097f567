//! Generation seam used by the chat turn orchestrator.

use async_trait::async_trait;
use persona_core::types::RoomId;

use crate::client::{GenerationClient, GenerationError};
use crate::messages::{GenerationReply, GenerationRequest};

/// Produces one character reply per call.
///
/// The production implementation is [`GenerationClient`]; it is built once
/// at startup and shared as `Arc<dyn GenerationService>`.
#[async_trait]
pub trait GenerationService: Send + Sync {
    async fn generate(
        &self,
        room_id: RoomId,
        request: &GenerationRequest,
    ) -> Result<GenerationReply, GenerationError>;
}

#[async_trait]
impl GenerationService for GenerationClient {
    async fn generate(
        &self,
        room_id: RoomId,
        request: &GenerationRequest,
    ) -> Result<GenerationReply, GenerationError> {
        GenerationClient::generate(self, room_id, request).await
    }
}
