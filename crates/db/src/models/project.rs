//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use soundloft_core::ownership::Owned;
use soundloft_core::types::{DbId, Timestamp};

/// A DAW project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub user_id: DbId,
    pub title: String,
    pub bpm: i32,
    /// Opaque timeline document, echoed back exactly as stored.
    pub arrangement: serde_json::Value,
    pub created_at: Timestamp,
    #[sqlx(rename = "updated_at")]
    pub last_updated: Timestamp,
}

impl Owned for Project {
    fn owner_id(&self) -> DbId {
        self.user_id
    }
}

/// DTO for creating a new project. Missing fields take the defaults from
/// `soundloft_core::catalog` and `soundloft_core::arrangement::empty`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateProject {
    pub title: Option<String>,
    pub bpm: Option<i32>,
    pub arrangement: Option<serde_json::Value>,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub bpm: Option<i32>,
    pub arrangement: Option<serde_json::Value>,
}
