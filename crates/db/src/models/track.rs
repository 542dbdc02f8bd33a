//! Track entity model, DTOs, and the enriched listing row.

use serde::Serialize;
use sqlx::FromRow;
use soundloft_core::ownership::Owned;
use soundloft_core::types::{DbId, DurationSecs, Timestamp};

/// A row from the `tracks` table.
///
/// `audio_file` and `cover_art` are blob keys, not URLs.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Track {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub audio_file: String,
    pub cover_art: Option<String>,
    pub genre: String,
    pub bpm: Option<i32>,
    pub duration: Option<DurationSecs>,
    pub listens_count: i64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Owned for Track {
    fn owner_id(&self) -> DbId {
        self.user_id
    }
}

/// DTO for creating a new track. The owner is passed separately.
#[derive(Debug, Clone)]
pub struct CreateTrack {
    pub title: String,
    pub audio_file: String,
    pub cover_art: Option<String>,
    pub genre: Option<String>,
    pub bpm: Option<i32>,
    pub duration: Option<DurationSecs>,
}

/// DTO for updating a track. Only `Some` fields are applied.
///
/// For the nullable columns `Some(None)` writes NULL, so a cover, BPM or
/// duration can be removed again.
#[derive(Debug, Clone, Default)]
pub struct UpdateTrack {
    pub title: Option<String>,
    pub audio_file: Option<String>,
    pub cover_art: Option<Option<String>>,
    pub genre: Option<String>,
    pub bpm: Option<Option<i32>>,
    pub duration: Option<Option<DurationSecs>>,
}

/// A track joined with its owner and social stats, as seen by one viewer.
///
/// `likes_count`, `is_liked`, `reposts_count` and `is_reposted` are computed
/// by the query and never stored.
#[derive(Debug, Clone, FromRow)]
pub struct TrackListing {
    pub id: DbId,
    pub user_id: DbId,
    pub owner_username: String,
    pub owner_profile_picture: Option<String>,
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

impl Owned for TrackListing {
    fn owner_id(&self) -> DbId {
        self.user_id
    }
}
