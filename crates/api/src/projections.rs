//! JSON shapes returned to clients.
//!
//! Rows store blob keys; these projections swap every key for the absolute
//! URL the [`BlobStore`] serves it from.

use serde::Serialize;
use soundloft_core::storage::BlobStore;
use soundloft_core::types::{DbId, DurationSecs, Timestamp};
use soundloft_db::models::project_file::ProjectFile;
use soundloft_db::models::track::TrackListing;
use soundloft_db::models::user::User;

/// Public identity record. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub username: String,
    pub email: String,
    pub profile_picture: Option<String>,
    pub is_creator: bool,
    pub is_listener: bool,
    pub creator_since: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl UserResponse {
    pub fn new(user: User, blobs: &dyn BlobStore) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            profile_picture: user.profile_picture.map(|key| blobs.url(&key)),
            is_creator: user.is_creator,
            is_listener: user.is_listener,
            creator_since: user.creator_since,
            created_at: user.created_at,
        }
    }
}

/// A track as seen by the requesting user.
#[derive(Debug, Serialize)]
pub struct TrackResponse {
    pub id: DbId,
    /// Owner's username.
    pub user: String,
    pub user_id: DbId,
    pub user_profile_picture: Option<String>,
    pub title: String,
    pub audio_file: String,
    pub cover_art: Option<String>,
    pub genre: String,
    pub bpm: Option<i32>,
    pub duration: Option<DurationSecs>,
    pub listens_count: i64,
    pub created_at: Timestamp,
    pub likes_count: i64,
    pub is_liked: bool,
    pub reposts_count: i64,
    pub is_reposted: bool,
}

impl TrackResponse {
    pub fn new(row: TrackListing, blobs: &dyn BlobStore) -> Self {
        Self {
            id: row.id,
            user: row.owner_username,
            user_id: row.user_id,
            user_profile_picture: row.owner_profile_picture.map(|key| blobs.url(&key)),
            title: row.title,
            audio_file: blobs.url(&row.audio_file),
            cover_art: row.cover_art.map(|key| blobs.url(&key)),
            genre: row.genre,
            bpm: row.bpm,
            duration: row.duration,
            listens_count: row.listens_count,
            created_at: row.created_at,
            likes_count: row.likes_count,
            is_liked: row.is_liked,
            reposts_count: row.reposts_count,
            is_reposted: row.is_reposted,
        }
    }

    pub fn list(rows: Vec<TrackListing>, blobs: &dyn BlobStore) -> Vec<Self> {
        rows.into_iter().map(|row| Self::new(row, blobs)).collect()
    }
}

/// A project stem.
#[derive(Debug, Serialize)]
pub struct ProjectFileResponse {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub file: String,
    pub duration: Option<DurationSecs>,
    pub created_at: Timestamp,
}

impl ProjectFileResponse {
    pub fn new(file: ProjectFile, blobs: &dyn BlobStore) -> Self {
        Self {
            id: file.id,
            project_id: file.project_id,
            name: file.name,
            file: blobs.url(&file.file),
            duration: file.duration,
            created_at: file.created_at,
        }
    }
}
