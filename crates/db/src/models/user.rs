//! User entity model and DTOs.

use sqlx::FromRow;
use soundloft_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    /// Blob key of the profile picture, if one was uploaded.
    pub profile_picture: Option<String>,
    pub is_creator: bool,
    pub is_listener: bool,
    pub creator_since: Option<Timestamp>,
    pub last_login_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new user.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub is_creator: bool,
    pub is_listener: bool,
    pub creator_since: Option<Timestamp>,
}

/// DTO for updating an existing user. All fields are optional.
///
/// `creator_since` is only ever written when the stored value is NULL.
#[derive(Debug, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub is_creator: Option<bool>,
    pub is_listener: Option<bool>,
    pub creator_since: Option<Timestamp>,
}
