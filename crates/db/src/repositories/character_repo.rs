//! Repository for the `characters` table and its joined read views.

use persona_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::character::{
    Character, CharacterFields, CharacterSummary, CharacterView, CreatePrompt,
};
use crate::models::status::RecordStatus;
use crate::models::tag::CreateTag;
use crate::repositories::{PromptRepo, TagRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, owner_id, field_id, voice_id, name, description, honorifics, \
                       status_id, created_at, updated_at";

/// Active characters joined with their current prompt, newest active image,
/// and live follower count. Callers append extra `AND` filters and ordering.
///
/// `status_id = 1` is `RecordStatus::Active`.
const VIEW_SELECT: &str = "\
    SELECT c.id, c.owner_id, c.field_id, c.voice_id, c.name, c.description, c.honorifics, \
           c.created_at, \
           p.id AS prompt_id, p.version AS prompt_version, p.appearance, p.personality, \
           p.background, p.speech_style, p.example_dialogues, \
           img.file_path AS image_path, \
           (SELECT COUNT(*) FROM friends f \
             WHERE f.character_id = c.id AND f.status_id = 1) AS follower_count \
    FROM characters c \
    JOIN ( \
        SELECT DISTINCT ON (character_id) * FROM character_prompts \
        ORDER BY character_id, created_at DESC, version DESC \
    ) p ON p.character_id = c.id \
    LEFT JOIN LATERAL ( \
        SELECT i.file_path FROM image_mappings m \
        JOIN images i ON i.id = m.image_id \
        WHERE m.character_id = c.id AND m.status_id = 1 \
        ORDER BY m.id DESC LIMIT 1 \
    ) img ON TRUE \
    WHERE c.status_id = 1";

/// Provides CRUD operations for characters.
pub struct CharacterRepo;

impl CharacterRepo {
    /// Create a character with its first prompt, optional image, and tags in
    /// one transaction. Returns the new character id.
    pub async fn create(
        pool: &PgPool,
        fields: &CharacterFields,
        prompt: &CreatePrompt,
        image_path: Option<&str>,
        tags: &[CreateTag],
    ) -> Result<DbId, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO characters (owner_id, field_id, voice_id, name, description, honorifics)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let character = sqlx::query_as::<_, Character>(&query)
            .bind(fields.owner_id)
            .bind(fields.field_id)
            .bind(&fields.voice_id)
            .bind(&fields.name)
            .bind(&fields.description)
            .bind(&fields.honorifics)
            .fetch_one(&mut *tx)
            .await?;

        PromptRepo::append(&mut *tx, character.id, prompt).await?;
        if let Some(path) = image_path {
            Self::attach_image(&mut *tx, character.id, path).await?;
        }
        TagRepo::insert_many(&mut *tx, character.id, tags).await?;

        tx.commit().await?;
        Ok(character.id)
    }

    /// Replace the base columns, append a new prompt version, and optionally
    /// swap the image and replace the tag set, all in one transaction.
    ///
    /// `tags: None` leaves existing tags untouched. Returns `false` if the
    /// character does not exist or is inactive.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        fields: &CharacterFields,
        prompt: &CreatePrompt,
        image_path: Option<&str>,
        tags: Option<&[CreateTag]>,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let result = sqlx::query(
            "UPDATE characters SET
                field_id = $2,
                voice_id = $3,
                name = $4,
                description = $5,
                honorifics = $6
             WHERE id = $1 AND status_id = $7",
        )
        .bind(id)
        .bind(fields.field_id)
        .bind(&fields.voice_id)
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(&fields.honorifics)
        .bind(RecordStatus::Active.id())
        .execute(&mut *tx)
        .await?;
        if result.rows_affected() == 0 {
            return Ok(false);
        }

        PromptRepo::append(&mut *tx, id, prompt).await?;
        if let Some(path) = image_path {
            sqlx::query(
                "UPDATE image_mappings SET status_id = $2 WHERE character_id = $1 AND status_id = $3",
            )
            .bind(id)
            .bind(RecordStatus::Inactive.id())
            .bind(RecordStatus::Active.id())
            .execute(&mut *tx)
            .await?;
            Self::attach_image(&mut *tx, id, path).await?;
        }
        if let Some(tags) = tags {
            TagRepo::deactivate_for_character(&mut *tx, id).await?;
            TagRepo::insert_many(&mut *tx, id, tags).await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    async fn attach_image(
        conn: &mut PgConnection,
        character_id: DbId,
        file_path: &str,
    ) -> Result<(), sqlx::Error> {
        let image_id: DbId =
            sqlx::query_scalar("INSERT INTO images (file_path) VALUES ($1) RETURNING id")
                .bind(file_path)
                .fetch_one(&mut *conn)
                .await?;
        sqlx::query("INSERT INTO image_mappings (character_id, image_id) VALUES ($1, $2)")
            .bind(character_id)
            .bind(image_id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    /// Find an active character row by id.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Character>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM characters WHERE id = $1 AND status_id = $2");
        sqlx::query_as::<_, Character>(&query)
            .bind(id)
            .bind(RecordStatus::Active.id())
            .fetch_optional(pool)
            .await
    }

    /// One active character with its current prompt.
    pub async fn find_view(pool: &PgPool, id: DbId) -> Result<Option<CharacterView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} AND c.id = $1");
        sqlx::query_as::<_, CharacterView>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All active characters, newest first.
    pub async fn list_views(pool: &PgPool) -> Result<Vec<CharacterView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} ORDER BY c.created_at DESC, c.id DESC");
        sqlx::query_as::<_, CharacterView>(&query)
            .fetch_all(pool)
            .await
    }

    /// Active characters owned by a user, newest first.
    pub async fn list_views_by_owner(
        pool: &PgPool,
        owner_id: DbId,
    ) -> Result<Vec<CharacterView>, sqlx::Error> {
        let query = format!("{VIEW_SELECT} AND c.owner_id = $1 ORDER BY c.created_at DESC, c.id DESC");
        sqlx::query_as::<_, CharacterView>(&query)
            .bind(owner_id)
            .fetch_all(pool)
            .await
    }

    /// Active characters the user actively follows, most recently followed first.
    pub async fn list_views_followed_by(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<CharacterView>, sqlx::Error> {
        let query = format!(
            "SELECT v.* FROM ({VIEW_SELECT}) v
             JOIN friends f ON f.character_id = v.id
             WHERE f.user_id = $1 AND f.status_id = $2
             ORDER BY f.created_at DESC, f.id DESC"
        );
        sqlx::query_as::<_, CharacterView>(&query)
            .bind(user_id)
            .bind(RecordStatus::Active.id())
            .fetch_all(pool)
            .await
    }

    /// Case-sensitive substring search over name and description of active
    /// characters.
    pub async fn search(pool: &PgPool, term: &str) -> Result<Vec<CharacterSummary>, sqlx::Error> {
        sqlx::query_as::<_, CharacterSummary>(
            "SELECT id, name, description FROM characters
             WHERE status_id = $2
               AND (strpos(name, $1) > 0 OR strpos(description, $1) > 0)
             ORDER BY id",
        )
        .bind(term)
        .bind(RecordStatus::Active.id())
        .fetch_all(pool)
        .await
    }

    /// Soft-delete a character. Returns `true` if an active row was deactivated.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result =
            sqlx::query("UPDATE characters SET status_id = $2 WHERE id = $1 AND status_id = $3")
                .bind(id)
                .bind(RecordStatus::Inactive.id())
                .bind(RecordStatus::Active.id())
                .execute(pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }
}
