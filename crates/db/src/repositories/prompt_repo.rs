//! Repository for the append-only `character_prompts` table.

use persona_core::types::DbId;
use sqlx::{PgConnection, PgExecutor};

use crate::models::character::{CharacterPrompt, CreatePrompt};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, character_id, version, appearance, personality, background, \
                       speech_style, example_dialogues, created_at";

/// Prompt snapshots are only ever appended; rooms keep pointing at old rows.
pub struct PromptRepo;

impl PromptRepo {
    /// Append the next prompt version for a character.
    ///
    /// Must run inside the caller's transaction so the `MAX(version)` read
    /// and the insert see the same snapshot; a concurrent append loses on
    /// `uq_character_prompts_character_version`.
    pub async fn append(
        conn: &mut PgConnection,
        character_id: DbId,
        input: &CreatePrompt,
    ) -> Result<CharacterPrompt, sqlx::Error> {
        let query = format!(
            "INSERT INTO character_prompts
                (character_id, version, appearance, personality, background,
                 speech_style, example_dialogues)
             VALUES (
                $1,
                (SELECT COALESCE(MAX(version), 0) + 1 FROM character_prompts WHERE character_id = $1),
                $2, $3, $4, $5, $6
             )
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CharacterPrompt>(&query)
            .bind(character_id)
            .bind(&input.appearance)
            .bind(&input.personality)
            .bind(&input.background)
            .bind(&input.speech_style)
            .bind(&input.example_dialogues)
            .fetch_one(conn)
            .await
    }

    /// The current prompt: latest `created_at`, ties broken by highest version.
    pub async fn find_current<'e, E: PgExecutor<'e>>(
        executor: E,
        character_id: DbId,
    ) -> Result<Option<CharacterPrompt>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM character_prompts
             WHERE character_id = $1
             ORDER BY created_at DESC, version DESC
             LIMIT 1"
        );
        sqlx::query_as::<_, CharacterPrompt>(&query)
            .bind(character_id)
            .fetch_optional(executor)
            .await
    }
}
