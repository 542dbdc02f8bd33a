//! Project stem file model and DTOs.

use sqlx::FromRow;
use soundloft_core::types::{DbId, DurationSecs, Timestamp};

/// A stem uploaded into a project. Ownership is through the parent project.
#[derive(Debug, Clone, FromRow)]
pub struct ProjectFile {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    /// Blob key of the audio payload.
    pub file: String,
    pub duration: Option<DurationSecs>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a stem. A missing name becomes `"Recording"`.
#[derive(Debug, Clone)]
pub struct CreateProjectFile {
    pub name: Option<String>,
    pub file: String,
    pub duration: Option<DurationSecs>,
}
