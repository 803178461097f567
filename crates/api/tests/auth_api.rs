//! HTTP-level integration tests for signup, signin, token verification, and
//! account self-service.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get, get_auth, post_json, put_json_auth};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Signup / signin
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signup_then_signin_returns_token(pool: PgPool) {
    let user_id = common::signup(&pool, "abc", "p").await;

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/auth/signin",
        serde_json::json!({"login_id": "abc", "password": "p"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["data"]["token"].is_string());
    assert_eq!(json["data"]["user_id"], user_id);
    assert_eq!(json["data"]["expires_in"], 3600);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_signup_hides_password_hash(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/auth/signup",
        serde_json::json!({"login_id": "mira", "nickname": "Mira", "password": "secret"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["login_id"], "mira");
    assert!(json["data"].get("password_hash").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_login_id_returns_409(pool: PgPool) {
    common::signup(&pool, "taken", "p").await;

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/auth/signup",
        serde_json::json!({"login_id": "taken", "nickname": "Other", "password": "q"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["code"], "CONFLICT");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blank_signup_fields_return_400(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/auth/signup",
        serde_json::json!({"login_id": "  ", "nickname": "x", "password": "p"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_wrong_password_returns_401(pool: PgPool) {
    common::signup(&pool, "abc", "p").await;

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/auth/signin",
        serde_json::json!({"login_id": "abc", "password": "not-p"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_login_returns_401(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/auth/signin",
        serde_json::json!({"login_id": "ghost", "password": "p"}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Token verification
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_verify_echoes_identity(pool: PgPool) {
    let user_id = common::signup(&pool, "abc", "p").await;
    let token = common::signin(&pool, "abc", "p").await;

    let response = get_auth(common::build_test_app(pool), "/api/v1/auth/verify", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["user_id"], user_id);
    assert_eq!(json["data"]["login_id"], "abc");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_verify_without_token_returns_401(pool: PgPool) {
    let response = get(common::build_test_app(pool), "/api/v1/auth/verify").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_verify_with_garbage_token_returns_401(pool: PgPool) {
    let response = get_auth(
        common::build_test_app(pool),
        "/api/v1/auth/verify",
        "definitely.not.valid",
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Account self-service
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_own_nickname_and_password(pool: PgPool) {
    let user_id = common::signup(&pool, "abc", "p").await;
    let token = common::signin(&pool, "abc", "p").await;

    let response = put_json_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/users/{user_id}"),
        serde_json::json!({"nickname": "Renamed", "password": "new-p"}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["nickname"], "Renamed");

    // The new password works, the old one does not.
    common::signin(&pool, "abc", "new-p").await;
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/auth/signin",
        serde_json::json!({"login_id": "abc", "password": "p"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_updating_another_user_is_forbidden(pool: PgPool) {
    common::signup(&pool, "abc", "p").await;
    let other_id = common::signup(&pool, "xyz", "p").await;
    let token = common::signin(&pool, "abc", "p").await;

    let response = put_json_auth(
        common::build_test_app(pool),
        &format!("/api/v1/users/{other_id}"),
        serde_json::json!({"nickname": "Hijacked"}),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deactivated_user_cannot_sign_in(pool: PgPool) {
    let user_id = common::signup(&pool, "abc", "p").await;
    let token = common::signin(&pool, "abc", "p").await;

    let response = delete_auth(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/users/{user_id}"),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/users/{user_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/auth/signin",
        serde_json::json!({"login_id": "abc", "password": "p"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
