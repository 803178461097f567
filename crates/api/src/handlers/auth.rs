//! Handlers for the `/auth` resource (signup, signin, verify).

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use persona_core::error::CoreError;
use persona_core::types::DbId;
use persona_core::validation::require_non_blank;
use persona_db::models::user::{CreateUser, User};
use persona_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::generate_access_token;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /auth/signup`.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub login_id: String,
    pub nickname: String,
    pub password: String,
}

/// Request body for `POST /auth/signin`.
#[derive(Debug, Deserialize)]
pub struct SigninRequest {
    pub login_id: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SigninResponse {
    pub token: String,
    pub user_id: DbId,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub user_id: DbId,
    pub login_id: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/auth/signup
///
/// Create an account. A taken `login_id` surfaces as 409 through the
/// `uq_users_login_id` constraint.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<User>>)> {
    require_non_blank("login_id", &input.login_id)?;
    require_non_blank("nickname", &input.nickname)?;
    require_non_blank("password", &input.password)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            login_id: input.login_id,
            nickname: input.nickname,
            password_hash,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, login_id = %user.login_id, "User signed up");
    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// POST /api/v1/auth/signin
///
/// Exchange credentials for an access token. Unknown login ids and wrong
/// passwords are indistinguishable to the caller.
pub async fn signin(
    State(state): State<AppState>,
    Json(input): Json<SigninRequest>,
) -> AppResult<Json<DataResponse<SigninResponse>>> {
    let invalid = || {
        AppError::Core(CoreError::Unauthorized(
            "Invalid login id or password".into(),
        ))
    };

    let user = UserRepo::find_by_login_id(&state.pool, &input.login_id)
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        return Err(invalid());
    }

    let token = generate_access_token(user.id, &user.login_id, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;

    tracing::info!(user_id = user.id, "User signed in");
    Ok(Json(DataResponse {
        data: SigninResponse {
            token,
            user_id: user.id,
            expires_in: state.config.jwt.access_token_expiry_mins * 60,
        },
    }))
}

/// GET /api/v1/auth/verify
///
/// Echo the identity carried by a valid bearer token.
pub async fn verify(auth: AuthUser) -> Json<DataResponse<VerifyResponse>> {
    Json(DataResponse {
        data: VerifyResponse {
            user_id: auth.user_id,
            login_id: auth.login_id,
        },
    })
}
