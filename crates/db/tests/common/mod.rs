//! Shared fixtures for repository integration tests.

#![allow(dead_code)]

use persona_core::persona::{default_honorifics, serialize_honorifics};
use persona_core::types::DbId;
use persona_db::models::character::{CharacterFields, CreatePrompt};
use persona_db::models::tag::CreateTag;
use persona_db::models::user::CreateUser;
use persona_db::repositories::{CharacterRepo, UserRepo};
use sqlx::PgPool;

/// Id of the first seeded field.
pub const FIELD_ID: DbId = 1;

pub async fn create_user(pool: &PgPool, login_id: &str) -> DbId {
    let user = UserRepo::create(
        pool,
        &CreateUser {
            login_id: login_id.to_string(),
            nickname: format!("{login_id} nick"),
            password_hash: "not-a-real-hash".to_string(),
        },
    )
    .await
    .unwrap();
    user.id
}

pub fn character_fields(owner_id: DbId, name: &str) -> CharacterFields {
    CharacterFields {
        owner_id,
        field_id: FIELD_ID,
        voice_id: None,
        name: name.to_string(),
        description: format!("{name} description"),
        honorifics: serialize_honorifics(&default_honorifics()),
    }
}

pub fn prompt(appearance: &str) -> CreatePrompt {
    CreatePrompt {
        appearance: appearance.to_string(),
        personality: "calm".to_string(),
        background: "harbour town".to_string(),
        speech_style: "short sentences".to_string(),
        example_dialogues: None,
    }
}

pub fn tag(name: &str) -> CreateTag {
    CreateTag {
        name: name.to_string(),
        description: String::new(),
    }
}

pub async fn create_character(pool: &PgPool, owner_id: DbId, name: &str) -> DbId {
    CharacterRepo::create(
        pool,
        &character_fields(owner_id, name),
        &prompt("v1"),
        Some("uploads/characters/portrait.png"),
        &[],
    )
    .await
    .unwrap()
}
