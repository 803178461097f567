//! One user message in, one character reply out.

use std::sync::Arc;

use persona_core::error::CoreError;
use persona_core::history::{format_history, DEFAULT_HISTORY_LIMIT};
use persona_core::persona::{parse_dialogues, parse_honorifics};
use persona_core::types::RoomId;
use persona_db::models::chat_room::RoomContext;
use persona_db::repositories::{ChatLogRepo, ChatRoomRepo};
use persona_db::DbPool;
use persona_llm::messages::GenerationRequest;
use persona_llm::service::GenerationService;
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// Attempts before a turn that keeps losing the version race gives up.
pub const MAX_TURN_ATTEMPTS: u32 = 2;

/// Result of a completed turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnOutcome {
    pub user_message: String,
    pub bot_message: String,
    pub updated_favorability: i32,
    pub emotion: String,
}

/// Runs chat turns against the database and a generation backend.
///
/// Each attempt:
/// 1. Load the active room with its bound prompt snapshot and character.
/// 2. Parse honorifics and example dialogues, defaulting on bad data.
/// 3. Format the most recent log fragments into a transcript.
/// 4. Ask the generation service for a reply.
/// 5. Write the reported favorability if the room version is unchanged.
///
/// A lost version race restarts from step 1. Chat logs are never written
/// here; clients record them separately.
pub struct ChatTurnOrchestrator {
    pool: DbPool,
    generation: Arc<dyn GenerationService>,
}

impl ChatTurnOrchestrator {
    pub fn new(pool: DbPool, generation: Arc<dyn GenerationService>) -> Self {
        Self { pool, generation }
    }

    pub async fn run(&self, room_id: RoomId, user_message: &str) -> AppResult<TurnOutcome> {
        for attempt in 1..=MAX_TURN_ATTEMPTS {
            // 1. Resolve context.
            let context = ChatRoomRepo::find_context(&self.pool, room_id)
                .await?
                .ok_or_else(|| CoreError::not_found("ChatRoom", room_id))?;

            // 3. Bounded history.
            let fragments =
                ChatLogRepo::recent_transcripts(&self.pool, room_id, DEFAULT_HISTORY_LIMIT)
                    .await?;
            let history = format_history(&fragments);

            // 2 + 4. Build inputs and generate.
            let request = build_request(&context, user_message, history);
            let reply = self.generation.generate(room_id, &request).await?;

            // 5. Apply the favorability delta.
            let applied = ChatRoomRepo::update_favorability(
                &self.pool,
                room_id,
                context.version,
                reply.favorability,
            )
            .await?;

            if applied {
                tracing::info!(
                    %room_id,
                    attempt,
                    favorability = reply.favorability,
                    emotion = %reply.emotion,
                    "Chat turn completed",
                );
                return Ok(TurnOutcome {
                    user_message: user_message.to_string(),
                    bot_message: reply.text,
                    updated_favorability: reply.favorability,
                    emotion: reply.emotion,
                });
            }

            tracing::warn!(%room_id, attempt, "Room changed during chat turn, retrying");
        }

        Err(AppError::Core(CoreError::Conflict(format!(
            "Chat room {room_id} was modified concurrently, please retry"
        ))))
    }
}

/// Assemble the generation payload from a room snapshot.
pub fn build_request(context: &RoomContext, user_message: &str, history: String) -> GenerationRequest {
    GenerationRequest {
        user_message: user_message.to_string(),
        character_name: context.character_name.clone(),
        honorifics: parse_honorifics(context.honorifics.as_deref()),
        user_display_name: context.user_display_name.clone(),
        user_introduction: context.user_introduction.clone(),
        favorability: context.favorability,
        appearance: context.appearance.clone(),
        personality: context.personality.clone(),
        background: context.background.clone(),
        speech_style: context.speech_style.clone(),
        example_dialogues: parse_dialogues(context.example_dialogues.as_deref()),
        chat_history: history,
    }
}
