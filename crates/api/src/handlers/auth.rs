//! Handlers for account registration and sessions (register, login, refresh, logout).

use axum::extract::State;
use axum::http::header::USER_AGENT;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use soundloft_core::accounts::{self, MIN_PASSWORD_LENGTH};
use soundloft_core::error::CoreError;
use soundloft_db::models::session::CreateSession;
use soundloft_db::models::user::{CreateUser, User};
use soundloft_db::repositories::{SessionRepo, UserRepo};
use validator::{Validate, ValidationErrors};

use crate::auth::jwt::RefreshToken;
use crate::auth::password::{check_password, hash_password, validate_password_strength};
use crate::error::{add_field_error, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::projections::UserResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /register`.
///
/// Missing strings deserialize as empty so they are reported per field.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    #[validate(email(message = "Enter a valid email address."))]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub is_creator: bool,
    #[serde(default = "default_is_listener")]
    pub is_listener: bool,
}

fn default_is_listener() -> bool {
    true
}

/// Request body for `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request body for `POST /refresh`.
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Successful authentication response returned by login and refresh.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds.
    pub expires_in: i64,
    pub user: UserResponse,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/register
///
/// Create an account. All input problems are reported together, keyed by field.
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let mut errors = match input.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    };

    if let Err(CoreError::Validation(msg)) = accounts::validate_username(&input.username) {
        add_field_error(&mut errors, "username", msg);
    } else if UserRepo::find_by_username(&state.pool, &input.username)
        .await?
        .is_some()
    {
        add_field_error(&mut errors, "username", "A user with that username already exists.");
    }

    if !input.email.is_empty()
        && UserRepo::find_by_email(&state.pool, &input.email)
            .await?
            .is_some()
    {
        add_field_error(&mut errors, "email", "A user with that email already exists.");
    }

    if let Err(msg) = validate_password_strength(&input.password, MIN_PASSWORD_LENGTH) {
        add_field_error(&mut errors, "password", msg);
    }

    if !errors.errors().is_empty() {
        return Err(AppError::Fields(errors));
    }

    let password_hash = hash_password(input.password.clone()).await?;

    // A concurrent registration that slips past the pre-checks above hits
    // the unique constraint and surfaces as 409.
    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: input.username,
            email: input.email,
            password_hash,
            is_creator: input.is_creator,
            is_listener: input.is_listener,
            creator_since: accounts::creator_since_on_register(input.is_creator, Utc::now()),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, is_creator = user.is_creator, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(UserResponse::new(user, state.blobs.as_ref())),
    ))
}

/// POST /api/v1/login
///
/// Authenticate with username + password. Returns access and refresh tokens.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid =
        || AppError::Core(CoreError::Unauthorized("Invalid username or password".into()));

    let user = UserRepo::find_by_username(&state.pool, &input.username).await?;
    let stored = user.as_ref().map(|u| u.password_hash.clone());

    if !check_password(input.password, stored).await? {
        match &user {
            Some(user) => tracing::info!(user_id = user.id, "Rejected login with wrong password"),
            None => tracing::info!("Rejected login for unknown username"),
        }
        return Err(invalid());
    }
    let user = user.ok_or_else(invalid)?;

    UserRepo::record_successful_login(&state.pool, user.id).await?;

    let user_id = user.id;
    let response = create_auth_response(&state, user, user_agent(&headers)).await?;
    tracing::info!(user_id, "User logged in");

    Ok(Json(response))
}

/// POST /api/v1/refresh
///
/// Exchange a valid refresh token for a new token pair. The old session is
/// revoked; replaying it fails.
pub async fn refresh(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let invalid =
        || AppError::Core(CoreError::Unauthorized("Invalid or expired refresh token".into()));

    let token_hash = RefreshToken::hash(&input.refresh_token);
    let session = SessionRepo::consume(&state.pool, &token_hash)
        .await?
        .ok_or_else(invalid)?;

    let user = UserRepo::find_by_id(&state.pool, session.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))?;

    let response = create_auth_response(&state, user, user_agent(&headers)).await?;
    Ok(Json(response))
}

/// POST /api/v1/logout
///
/// Revoke all sessions for the authenticated user. Returns 204 No Content.
pub async fn logout(State(state): State<AppState>, auth: AuthUser) -> AppResult<StatusCode> {
    let revoked = SessionRepo::revoke_all_for_user(&state.pool, auth.user_id).await?;
    let pruned = SessionRepo::prune_for_user(&state.pool, auth.user_id).await?;
    tracing::info!(user_id = auth.user_id, revoked, pruned, "User logged out");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn user_agent(headers: &HeaderMap) -> Option<String> {
    headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

/// Generate access + refresh tokens, persist a session row, and build the response.
async fn create_auth_response(
    state: &AppState,
    user: User,
    user_agent: Option<String>,
) -> AppResult<AuthResponse> {
    let jwt = &state.config.jwt;
    let access = jwt
        .issue_access_token(user.id)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let refresh = RefreshToken::generate();

    SessionRepo::create(
        &state.pool,
        &CreateSession {
            user_id: user.id,
            refresh_token_hash: refresh.hash,
            expires_at: jwt.refresh_expires_at(),
            user_agent,
        },
    )
    .await?;

    Ok(AuthResponse {
        access_token: access.token,
        refresh_token: refresh.plaintext,
        expires_in: access.expires_in,
        user: UserResponse::new(user, state.blobs.as_ref()),
    })
}
