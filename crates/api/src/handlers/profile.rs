//! Handlers for the authenticated user's own profile.

use axum::extract::{Multipart, State};
use axum::Json;
use chrono::Utc;
use serde::Deserialize;
use soundloft_core::accounts;
use soundloft_core::catalog::image_extension;
use soundloft_core::error::CoreError;
use soundloft_core::storage::{self, BlobFolder};
use soundloft_db::models::user::{UpdateUser, User};
use soundloft_db::repositories::UserRepo;
use validator::{Validate, ValidationErrors};

use crate::error::{add_field_error, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::projections::UserResponse;
use crate::state::AppState;
use crate::upload::{StagedBlobs, UploadForm};

/// Request body for `PUT`/`PATCH /profile`. Every field is optional.
///
/// `creator_since` is not accepted; the server stamps it.
#[derive(Debug, Default, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    #[validate(email(message = "Enter a valid email address."))]
    pub email: Option<String>,
    pub is_creator: Option<bool>,
    pub is_listener: Option<bool>,
}

/// GET /api/v1/profile
pub async fn get_profile(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<UserResponse>> {
    let user = load_user(&state, auth).await?;
    Ok(Json(UserResponse::new(user, state.blobs.as_ref())))
}

/// PUT|PATCH /api/v1/profile
///
/// Applies the supplied fields. Turning `is_creator` on for the first time
/// stamps `creator_since`.
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserResponse>> {
    let current = load_user(&state, auth).await?;

    let mut errors = match input.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(errors) => errors,
    };

    if let Some(username) = input.username.as_deref() {
        if let Err(CoreError::Validation(msg)) = accounts::validate_username(username) {
            add_field_error(&mut errors, "username", msg);
        } else if let Some(other) = UserRepo::find_by_username(&state.pool, username).await? {
            if other.id != current.id {
                add_field_error(&mut errors, "username", "A user with that username already exists.");
            }
        }
    }
    if let Some(email) = input.email.as_deref() {
        if let Some(other) = UserRepo::find_by_email(&state.pool, email).await? {
            if other.id != current.id {
                add_field_error(&mut errors, "email", "A user with that email already exists.");
            }
        }
    }
    if !errors.errors().is_empty() {
        return Err(AppError::Fields(errors));
    }

    let creator_since = accounts::creator_since_on_update(
        current.is_creator,
        current.creator_since,
        input.is_creator,
        Utc::now(),
    );

    let updated = UserRepo::update(
        &state.pool,
        current.id,
        &UpdateUser {
            username: input.username,
            email: input.email,
            is_creator: input.is_creator,
            is_listener: input.is_listener,
            creator_since,
        },
    )
    .await?
    .ok_or_else(|| AppError::not_found("user", current.id))?;

    if updated.creator_since != current.creator_since {
        tracing::info!(user_id = updated.id, "User became a creator");
    }

    Ok(Json(UserResponse::new(updated, state.blobs.as_ref())))
}

/// POST /api/v1/profile/picture
///
/// Multipart field `profile_picture`. Replaces the previous picture and
/// deletes its blob.
pub async fn upload_picture(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> AppResult<Json<UserResponse>> {
    let current = load_user(&state, auth).await?;

    let mut form = UploadForm::read(multipart).await?;
    let picture = form.require_file("profile_picture")?;
    let ext = image_extension(&picture.data).map_err(AppError::for_field("profile_picture"))?;

    let mut staged = StagedBlobs::new(state.blobs.clone());
    let key = staged
        .put(BlobFolder::ProfilePictures, ext, &picture.data)
        .await?;

    let updated = match UserRepo::set_profile_picture(&state.pool, current.id, &key).await {
        Ok(Some(user)) => {
            staged.commit();
            user
        }
        Ok(None) => {
            staged.discard().await;
            return Err(AppError::not_found("user", current.id));
        }
        Err(e) => {
            staged.discard().await;
            return Err(e.into());
        }
    };

    storage::remove_all(state.blobs.as_ref(), current.profile_picture).await;
    tracing::info!(user_id = updated.id, key = %key, "Profile picture replaced");

    Ok(Json(UserResponse::new(updated, state.blobs.as_ref())))
}

/// The token may outlive the account; treat that as unauthenticated.
async fn load_user(state: &AppState, auth: AuthUser) -> AppResult<User> {
    UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::Unauthorized("User no longer exists".into())))
}
