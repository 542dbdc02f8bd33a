//! Field rules for tracks, projects and uploaded files.

use image::ImageFormat;

use crate::error::CoreError;
use crate::types::DurationSecs;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Title given to projects created without one.
pub const DEFAULT_PROJECT_TITLE: &str = "Untitled Project";

/// Tempo given to projects created without one.
pub const DEFAULT_PROJECT_BPM: i32 = 120;

/// Name given to stems uploaded without one.
pub const DEFAULT_STEM_NAME: &str = "Recording";

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

pub const MAX_TITLE_LENGTH: usize = 255;
pub const MAX_GENRE_LENGTH: usize = 100;
pub const MAX_BPM: i32 = 999;

/// Audio container extensions accepted for tracks and stems.
pub const AUDIO_EXTENSIONS: &[&str] = &[
    "mp3", "wav", "flac", "ogg", "oga", "aac", "m4a", "webm", "aiff",
];

// ---------------------------------------------------------------------------
// Field validation
// ---------------------------------------------------------------------------

/// Titles must be non-blank and at most 255 characters.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Title must not be blank".into()));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Title must be at most {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Genre may be empty but not longer than 100 characters.
pub fn validate_genre(genre: &str) -> Result<(), CoreError> {
    if genre.chars().count() > MAX_GENRE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Genre must be at most {MAX_GENRE_LENGTH} characters"
        )));
    }
    Ok(())
}

pub fn validate_bpm(bpm: i32) -> Result<(), CoreError> {
    if !(1..=MAX_BPM).contains(&bpm) {
        return Err(CoreError::Validation(format!(
            "BPM must be between 1 and {MAX_BPM}, got {bpm}"
        )));
    }
    Ok(())
}

pub fn validate_duration(duration: DurationSecs) -> Result<(), CoreError> {
    if !duration.is_finite() || duration < 0.0 {
        return Err(CoreError::Validation(format!(
            "Duration must be a non-negative number of seconds, got {duration}"
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Upload checks
// ---------------------------------------------------------------------------

/// Return the lower-cased extension of an audio upload, rejecting anything
/// not in [`AUDIO_EXTENSIONS`].
pub fn audio_extension(filename: &str) -> Result<String, CoreError> {
    let ext = match filename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() => ext.to_lowercase(),
        _ => String::new(),
    };
    if AUDIO_EXTENSIONS.contains(&ext.as_str()) {
        Ok(ext)
    } else {
        Err(CoreError::Validation(format!(
            "Unsupported audio format '{filename}'. Supported: {}",
            AUDIO_EXTENSIONS.join(", ")
        )))
    }
}

/// Sniff the leading bytes of an image upload and return the extension to
/// store it under. Only png, jpeg, webp and gif are accepted.
pub fn image_extension(data: &[u8]) -> Result<&'static str, CoreError> {
    match image::guess_format(data) {
        Ok(ImageFormat::Png) => Ok("png"),
        Ok(ImageFormat::Jpeg) => Ok("jpg"),
        Ok(ImageFormat::WebP) => Ok("webp"),
        Ok(ImageFormat::Gif) => Ok("gif"),
        _ => Err(CoreError::Validation(
            "Upload a valid image. The file is either not an image or a corrupted image".into(),
        )),
    }
}
