//! Handlers for the authenticated user's own tracks.
//!
//! Create and update take `multipart/form-data` with the text fields
//! `title`, `genre`, `bpm`, `duration` and the file fields `audio_file`,
//! `cover_art`. On update a field sent blank clears it: `genre` becomes
//! empty, `bpm` and `duration` become null, and a blank `cover_art` text
//! part removes the cover.

use std::str::FromStr;

use axum::body::Bytes;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use soundloft_core::catalog;
use soundloft_core::ownership::ensure_owner;
use soundloft_core::storage::{self, BlobFolder};
use soundloft_core::types::{DbId, DurationSecs};
use soundloft_db::models::track::{CreateTrack, TrackListing, UpdateTrack};
use soundloft_db::repositories::TrackRepo;
use validator::ValidationErrors;

use crate::error::{add_core_error, add_field_error, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::projections::TrackResponse;
use crate::state::AppState;
use crate::upload::{StagedBlobs, UploadForm};

// ---------------------------------------------------------------------------
// Form parsing
// ---------------------------------------------------------------------------

/// A validated track form. Files carry the extension they will be stored under.
///
/// For the nullable fields the outer `Option` says whether the field was
/// sent at all; a blank value arrives as `Some(None)` and clears it.
#[derive(Debug, Default)]
struct TrackForm {
    title: Option<String>,
    genre: Option<String>,
    bpm: Option<Option<i32>>,
    duration: Option<Option<DurationSecs>>,
    audio: Option<(String, Bytes)>,
    cover: Option<(&'static str, Bytes)>,
    clear_cover: bool,
}

impl TrackForm {
    /// Parse and validate every field, reporting all problems at once.
    /// With `require_core` set, `title` and `audio_file` must be present.
    async fn read(multipart: Multipart, require_core: bool) -> AppResult<Self> {
        let mut form = UploadForm::read(multipart).await?;
        let mut errors = ValidationErrors::new();
        let mut parsed = TrackForm::default();

        match form.text("title") {
            Some(title) => match catalog::validate_title(title) {
                Ok(()) => parsed.title = Some(title.to_string()),
                Err(e) => add_core_error(&mut errors, "title", e),
            },
            None if require_core => add_field_error(&mut errors, "title", "This field is required."),
            None => {}
        }

        if let Some(genre) = form.field("genre") {
            match catalog::validate_genre(genre) {
                Ok(()) => parsed.genre = Some(genre.to_string()),
                Err(e) => add_core_error(&mut errors, "genre", e),
            }
        }

        match form.field("bpm").map(parse_nullable::<i32>) {
            Some(Ok(Some(bpm))) => match catalog::validate_bpm(bpm) {
                Ok(()) => parsed.bpm = Some(Some(bpm)),
                Err(e) => add_core_error(&mut errors, "bpm", e),
            },
            Some(Ok(None)) => parsed.bpm = Some(None),
            Some(Err(_)) => add_field_error(&mut errors, "bpm", "A valid integer is required."),
            None => {}
        }

        match form.field("duration").map(parse_nullable::<DurationSecs>) {
            Some(Ok(Some(duration))) => match catalog::validate_duration(duration) {
                Ok(()) => parsed.duration = Some(Some(duration)),
                Err(e) => add_core_error(&mut errors, "duration", e),
            },
            Some(Ok(None)) => parsed.duration = Some(None),
            Some(Err(_)) => add_field_error(&mut errors, "duration", "A valid number is required."),
            None => {}
        }

        // A blank text part named `cover_art` removes the current cover.
        parsed.clear_cover = form.field("cover_art") == Some("");

        match form.take_file("audio_file") {
            Some(file) => match catalog::audio_extension(&file.file_name) {
                Ok(ext) => parsed.audio = Some((ext, file.data)),
                Err(e) => add_core_error(&mut errors, "audio_file", e),
            },
            None if require_core => {
                add_field_error(&mut errors, "audio_file", "No file was submitted.")
            }
            None => {}
        }

        if let Some(file) = form.take_file("cover_art") {
            match catalog::image_extension(&file.data) {
                Ok(ext) => parsed.cover = Some((ext, file.data)),
                Err(e) => add_core_error(&mut errors, "cover_art", e),
            }
        }

        if errors.errors().is_empty() {
            Ok(parsed)
        } else {
            Err(AppError::Fields(errors))
        }
    }
}

/// Blank parses to `None`; anything else must be a valid `T`.
fn parse_nullable<T: FromStr>(raw: &str) -> Result<Option<T>, T::Err> {
    if raw.is_empty() {
        Ok(None)
    } else {
        raw.parse().map(Some)
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/tracks
///
/// The caller's own tracks, newest first.
pub async fn list_tracks(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<TrackResponse>>> {
    let rows = TrackRepo::list_own(&state.pool, auth.user_id).await?;
    Ok(Json(TrackResponse::list(rows, state.blobs.as_ref())))
}

/// POST /api/v1/tracks
pub async fn create_track(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<TrackResponse>)> {
    let form = TrackForm::read(multipart, true).await?;
    let (title, (audio_ext, audio_data)) = match (form.title, form.audio) {
        (Some(title), Some(audio)) => (title, audio),
        _ => return Err(AppError::BadRequest("title and audio_file are required".into())),
    };

    let mut staged = StagedBlobs::new(state.blobs.clone());
    let audio_file = staged.put(BlobFolder::Tracks, &audio_ext, &audio_data).await?;
    let cover_art = match form.cover {
        Some((ext, data)) => Some(staged.put(BlobFolder::CoverArt, ext, &data).await?),
        None => None,
    };

    let input = CreateTrack {
        title,
        audio_file,
        cover_art,
        genre: form.genre,
        bpm: form.bpm.flatten(),
        duration: form.duration.flatten(),
    };
    let track = match TrackRepo::create(&state.pool, auth.user_id, &input).await {
        Ok(track) => {
            staged.commit();
            track
        }
        Err(e) => {
            staged.discard().await;
            return Err(e.into());
        }
    };

    tracing::info!(track_id = track.id, user_id = auth.user_id, "Track created");

    let listing = load_listing(&state, auth, track.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(TrackResponse::new(listing, state.blobs.as_ref())),
    ))
}

/// GET /api/v1/tracks/{id}
pub async fn get_track(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<TrackResponse>> {
    let listing = load_listing(&state, auth, id).await?;
    Ok(Json(TrackResponse::new(listing, state.blobs.as_ref())))
}

/// PUT /api/v1/tracks/{id}
///
/// Full update: `title` and `audio_file` are required.
pub async fn replace_track(
    state: State<AppState>,
    auth: AuthUser,
    id: Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<TrackResponse>> {
    update_track(state, auth, id, multipart, true).await
}

/// PATCH /api/v1/tracks/{id}
///
/// Partial update: any subset of fields.
pub async fn patch_track(
    state: State<AppState>,
    auth: AuthUser,
    id: Path<DbId>,
    multipart: Multipart,
) -> AppResult<Json<TrackResponse>> {
    update_track(state, auth, id, multipart, false).await
}

/// DELETE /api/v1/tracks/{id}
///
/// Removes the row (likes and reposts cascade) and then its blobs.
pub async fn delete_track(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let track = TrackRepo::delete(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("track", id))?;

    let keys = std::iter::once(track.audio_file).chain(track.cover_art);
    storage::remove_all(state.blobs.as_ref(), keys).await;

    tracing::info!(track_id = id, user_id = auth.user_id, "Track deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn update_track(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    multipart: Multipart,
    full: bool,
) -> AppResult<Json<TrackResponse>> {
    let existing = ensure_owner(
        "track",
        id,
        TrackRepo::find_by_id(&state.pool, id).await?,
        auth.user_id,
    )?;
    let form = TrackForm::read(multipart, full).await?;

    let mut staged = StagedBlobs::new(state.blobs.clone());
    let audio_file = match form.audio {
        Some((ext, data)) => Some(staged.put(BlobFolder::Tracks, &ext, &data).await?),
        None => None,
    };
    let cover_art = match form.cover {
        Some((ext, data)) => Some(Some(staged.put(BlobFolder::CoverArt, ext, &data).await?)),
        None if form.clear_cover => Some(None),
        None => None,
    };

    let mut replaced = Vec::new();
    if audio_file.is_some() {
        replaced.push(existing.audio_file);
    }
    if cover_art.is_some() {
        replaced.extend(existing.cover_art);
    }

    let patch = UpdateTrack {
        title: form.title,
        audio_file,
        cover_art,
        genre: form.genre,
        bpm: form.bpm,
        duration: form.duration,
    };
    match TrackRepo::update(&state.pool, id, auth.user_id, &patch).await {
        Ok(Some(_)) => staged.commit(),
        Ok(None) => {
            staged.discard().await;
            return Err(AppError::not_found("track", id));
        }
        Err(e) => {
            staged.discard().await;
            return Err(e.into());
        }
    }

    storage::remove_all(state.blobs.as_ref(), replaced).await;
    tracing::info!(track_id = id, user_id = auth.user_id, full, "Track updated");

    let listing = load_listing(&state, auth, id).await?;
    Ok(Json(TrackResponse::new(listing, state.blobs.as_ref())))
}

/// Fetch a track the caller owns, with viewer-relative stats.
async fn load_listing(state: &AppState, auth: AuthUser, id: DbId) -> AppResult<TrackListing> {
    let row = TrackRepo::find_listing(&state.pool, auth.user_id, id).await?;
    Ok(ensure_owner("track", id, row, auth.user_id)?)
}
