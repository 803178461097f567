//! Integration tests for users, follow edges, and rankings.

mod common;

use assert_matches::assert_matches;
use chrono::Utc;
use persona_db::models::chat_log::CreateChatLog;
use persona_db::models::chat_room::CreateChatRoom;
use persona_db::models::user::{CreateUser, UpdateUser};
use persona_db::repositories::{
    CharacterRepo, ChatLogRepo, ChatRoomRepo, FieldRepo, FriendRepo, RankRepo, TagRepo, UserRepo,
};
use sqlx::PgPool;

use common::{character_fields, create_character, create_user, prompt, tag};

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_login_id_violates_unique_constraint(pool: PgPool) {
    create_user(&pool, "abc").await;
    let err = UserRepo::create(
        &pool,
        &CreateUser {
            login_id: "abc".to_string(),
            nickname: "again".to_string(),
            password_hash: "x".to_string(),
        },
    )
    .await
    .unwrap_err();

    assert_matches!(
        err,
        sqlx::Error::Database(ref db) if db.constraint() == Some("uq_users_login_id")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_and_deactivate_user(pool: PgPool) {
    let id = create_user(&pool, "abc").await;

    let updated = UserRepo::update(
        &pool,
        id,
        &UpdateUser {
            nickname: Some("Renamed".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.nickname, "Renamed");
    assert_eq!(updated.password_hash, "not-a-real-hash");

    assert!(UserRepo::deactivate(&pool, id).await.unwrap());
    assert!(UserRepo::find_by_id(&pool, id).await.unwrap().is_none());
    assert!(UserRepo::find_by_login_id(&pool, "abc").await.unwrap().is_none());
    assert!(UserRepo::update(&pool, id, &UpdateUser::default())
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Follow edges
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_double_follow_conflicts_without_duplicate_row(pool: PgPool) {
    let user = create_user(&pool, "fan").await;
    let character = create_character(&pool, user, "Mira").await;

    FriendRepo::follow(&pool, user, character).await.unwrap();
    let err = FriendRepo::follow(&pool, user, character).await.unwrap_err();
    assert_matches!(
        err,
        sqlx::Error::Database(ref db) if db.constraint() == Some("uq_friends_active")
    );

    let active: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM friends WHERE user_id = $1 AND status_id = 1")
            .bind(user)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(active, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unfollow_then_refollow(pool: PgPool) {
    let user = create_user(&pool, "fan").await;
    let character = create_character(&pool, user, "Mira").await;

    assert!(!FriendRepo::unfollow(&pool, user, character).await.unwrap());
    FriendRepo::follow(&pool, user, character).await.unwrap();
    assert!(FriendRepo::is_following(&pool, user, character).await.unwrap());

    assert!(FriendRepo::unfollow(&pool, user, character).await.unwrap());
    assert!(!FriendRepo::is_following(&pool, user, character).await.unwrap());

    FriendRepo::follow(&pool, user, character).await.unwrap();
    assert!(FriendRepo::is_following(&pool, user, character).await.unwrap());
}

// ---------------------------------------------------------------------------
// Lookups and rankings
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_fields_are_seeded(pool: PgPool) {
    let fields = FieldRepo::list(&pool).await.unwrap();
    assert!(!fields.is_empty());
    let first = FieldRepo::find_by_id(&pool, fields[0].id).await.unwrap().unwrap();
    assert_eq!(first.category, fields[0].category);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_distinct_tag_names_skip_inactive(pool: PgPool) {
    let owner = create_user(&pool, "owner").await;
    let a = CharacterRepo::create(
        &pool,
        &character_fields(owner, "A"),
        &prompt("v1"),
        None,
        &[tag("sea"), tag("hero")],
    )
    .await
    .unwrap();
    CharacterRepo::create(
        &pool,
        &character_fields(owner, "B"),
        &prompt("v1"),
        None,
        &[tag("sea")],
    )
    .await
    .unwrap();
    CharacterRepo::update(
        &pool,
        a,
        &character_fields(owner, "A"),
        &prompt("v2"),
        None,
        Some(&[tag("sea")]),
    )
    .await
    .unwrap();

    let names = TagRepo::list_distinct_names(&pool).await.unwrap();
    assert_eq!(names, vec!["sea".to_string()]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rankings_for_owner(pool: PgPool) {
    let owner = create_user(&pool, "owner").await;
    let busy = CharacterRepo::create(
        &pool,
        &character_fields(owner, "Busy"),
        &prompt("v1"),
        None,
        &[tag("sea"), tag("hero")],
    )
    .await
    .unwrap();
    let quiet = CharacterRepo::create(
        &pool,
        &character_fields(owner, "Quiet"),
        &prompt("v1"),
        None,
        &[tag("sea")],
    )
    .await
    .unwrap();
    let _idle = create_character(&pool, owner, "Idle").await;

    for (character, spans) in [(busy, 3), (quiet, 1)] {
        let room = ChatRoomRepo::find_or_create(
            &pool,
            &CreateChatRoom {
                user_id: owner,
                character_id: character,
                user_display_name: String::new(),
                user_introduction: String::new(),
            },
        )
        .await
        .unwrap()
        .unwrap()
        .room;
        for _ in 0..spans {
            let now = Utc::now();
            ChatLogRepo::create(
                &pool,
                room.id,
                &CreateChatLog {
                    start_time: now,
                    end_time: now,
                    transcript: "user: hi".to_string(),
                },
            )
            .await
            .unwrap();
        }
    }

    let characters = RankRepo::top_characters(&pool, owner, 3).await.unwrap();
    let ranked: Vec<_> = characters.iter().map(|c| (c.name.as_str(), c.log_count)).collect();
    assert_eq!(ranked, vec![("Busy", 3), ("Quiet", 1)]);

    let fields = RankRepo::top_fields(&pool, owner, 3).await.unwrap();
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].character_count, 3);

    let tags = RankRepo::top_tags(&pool, owner, 3).await.unwrap();
    let ranked: Vec<_> = tags.iter().map(|t| (t.name.as_str(), t.tag_count)).collect();
    assert_eq!(ranked, vec![("sea", 2), ("hero", 1)]);
}
