//! Integration tests for chat rooms, chat logs, and the favorability write.

mod common;

use chrono::{Duration, Utc};
use persona_db::models::chat_log::CreateChatLog;
use persona_db::models::chat_room::CreateChatRoom;
use persona_db::repositories::{CharacterRepo, ChatLogRepo, ChatRoomRepo};
use sqlx::PgPool;

use common::{character_fields, create_character, create_user, prompt};

fn room_request(user_id: i64, character_id: i64) -> CreateChatRoom {
    CreateChatRoom {
        user_id,
        character_id,
        user_display_name: "Captain".to_string(),
        user_introduction: "A retired sailor".to_string(),
    }
}

// ---------------------------------------------------------------------------
// find_or_create
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_create_returns_existing_room(pool: PgPool) {
    let user = create_user(&pool, "player").await;
    let character = create_character(&pool, user, "Mira").await;

    let first = ChatRoomRepo::find_or_create(&pool, &room_request(user, character))
        .await
        .unwrap()
        .unwrap();
    assert!(!first.existed);
    assert_eq!(first.room.favorability, 0);
    assert_eq!(first.room.user_display_name, "Captain");

    let second = ChatRoomRepo::find_or_create(&pool, &room_request(user, character))
        .await
        .unwrap()
        .unwrap();
    assert!(second.existed);
    assert_eq!(second.room.id, first.room.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_new_prompt_version_gets_new_room(pool: PgPool) {
    let user = create_user(&pool, "player").await;
    let character = create_character(&pool, user, "Mira").await;

    let first = ChatRoomRepo::find_or_create(&pool, &room_request(user, character))
        .await
        .unwrap()
        .unwrap();
    CharacterRepo::update(
        &pool,
        character,
        &character_fields(user, "Mira"),
        &prompt("v2"),
        None,
        None,
    )
    .await
    .unwrap();

    let second = ChatRoomRepo::find_or_create(&pool, &room_request(user, character))
        .await
        .unwrap()
        .unwrap();
    assert!(!second.existed);
    assert_ne!(second.room.id, first.room.id);
    assert_ne!(second.room.prompt_id, first.room.prompt_id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_for_inactive_character_returns_none(pool: PgPool) {
    let user = create_user(&pool, "player").await;
    let character = create_character(&pool, user, "Mira").await;
    CharacterRepo::soft_delete(&pool, character).await.unwrap();

    let lookup = ChatRoomRepo::find_or_create(&pool, &room_request(user, character))
        .await
        .unwrap();
    assert!(lookup.is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deactivated_room_is_replaced(pool: PgPool) {
    let user = create_user(&pool, "player").await;
    let character = create_character(&pool, user, "Mira").await;

    let first = ChatRoomRepo::find_or_create(&pool, &room_request(user, character))
        .await
        .unwrap()
        .unwrap();
    assert!(ChatRoomRepo::deactivate(&pool, first.room.id).await.unwrap());
    assert!(!ChatRoomRepo::deactivate(&pool, first.room.id).await.unwrap());
    assert!(ChatRoomRepo::find_context(&pool, first.room.id)
        .await
        .unwrap()
        .is_none());

    let second = ChatRoomRepo::find_or_create(&pool, &room_request(user, character))
        .await
        .unwrap()
        .unwrap();
    assert!(!second.existed);
    assert_ne!(second.room.id, first.room.id);
}

// ---------------------------------------------------------------------------
// Context and favorability
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_context_joins_bound_prompt_snapshot(pool: PgPool) {
    let user = create_user(&pool, "player").await;
    let character = create_character(&pool, user, "Mira").await;
    let lookup = ChatRoomRepo::find_or_create(&pool, &room_request(user, character))
        .await
        .unwrap()
        .unwrap();

    // A later edit must not change the persona of the existing room.
    CharacterRepo::update(
        &pool,
        character,
        &character_fields(user, "Mira"),
        &prompt("v2"),
        None,
        None,
    )
    .await
    .unwrap();

    let context = ChatRoomRepo::find_context(&pool, lookup.room.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(context.appearance, "v1");
    assert_eq!(context.character_id, character);
    assert_eq!(context.character_name, "Mira");
    assert_eq!(context.user_introduction, "A retired sailor");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_favorability_write_checks_version(pool: PgPool) {
    let user = create_user(&pool, "player").await;
    let character = create_character(&pool, user, "Mira").await;
    let room = ChatRoomRepo::find_or_create(&pool, &room_request(user, character))
        .await
        .unwrap()
        .unwrap()
        .room;

    assert!(ChatRoomRepo::update_favorability(&pool, room.id, room.version, 15)
        .await
        .unwrap());
    // Stale token: the first write bumped the version.
    assert!(!ChatRoomRepo::update_favorability(&pool, room.id, room.version, 99)
        .await
        .unwrap());

    let reloaded = ChatRoomRepo::find_by_id(&pool, room.id).await.unwrap().unwrap();
    assert_eq!(reloaded.favorability, 15);
    assert_eq!(reloaded.version, room.version + 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_listing_includes_character_image(pool: PgPool) {
    let user = create_user(&pool, "player").await;
    let other = create_user(&pool, "other").await;
    let character = create_character(&pool, user, "Mira").await;
    ChatRoomRepo::find_or_create(&pool, &room_request(user, character))
        .await
        .unwrap();
    ChatRoomRepo::find_or_create(&pool, &room_request(other, character))
        .await
        .unwrap();

    let all = ChatRoomRepo::list(&pool).await.unwrap();
    assert_eq!(all.len(), 2);
    assert!(all
        .iter()
        .all(|r| r.image_path.as_deref() == Some("uploads/characters/portrait.png")));

    let mine = ChatRoomRepo::list_by_user(&pool, user).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].character_name, "Mira");
}

// ---------------------------------------------------------------------------
// Chat logs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_recent_transcripts_are_bounded_and_chronological(pool: PgPool) {
    let user = create_user(&pool, "player").await;
    let character = create_character(&pool, user, "Mira").await;
    let room = ChatRoomRepo::find_or_create(&pool, &room_request(user, character))
        .await
        .unwrap()
        .unwrap()
        .room;

    let base = Utc::now() - Duration::hours(1);
    for i in 0..12 {
        let start = base + Duration::minutes(i);
        ChatLogRepo::create(
            &pool,
            room.id,
            &CreateChatLog {
                start_time: start,
                end_time: start + Duration::seconds(30),
                transcript: format!("user: message {i}"),
            },
        )
        .await
        .unwrap();
    }

    let recent = ChatLogRepo::recent_transcripts(&pool, room.id, 10)
        .await
        .unwrap();
    assert_eq!(recent.len(), 10);
    assert_eq!(recent.first().map(String::as_str), Some("user: message 2"));
    assert_eq!(recent.last().map(String::as_str), Some("user: message 11"));

    let all = ChatLogRepo::list_by_room(&pool, room.id).await.unwrap();
    assert_eq!(all.len(), 12);
    assert!(all.windows(2).all(|w| w[0].start_time <= w[1].start_time));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_room_has_no_transcripts(pool: PgPool) {
    let user = create_user(&pool, "player").await;
    let character = create_character(&pool, user, "Mira").await;
    let room = ChatRoomRepo::find_or_create(&pool, &room_request(user, character))
        .await
        .unwrap()
        .unwrap()
        .room;

    assert!(ChatLogRepo::recent_transcripts(&pool, room.id, 10)
        .await
        .unwrap()
        .is_empty());
}
