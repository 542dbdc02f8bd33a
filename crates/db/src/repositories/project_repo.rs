//! Repository for the `projects` table.

use sqlx::PgPool;
use soundloft_core::arrangement;
use soundloft_core::catalog::{DEFAULT_PROJECT_BPM, DEFAULT_PROJECT_TITLE};
use soundloft_core::types::DbId;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries. `updated_at` is exposed as
/// `last_updated` through the model's `#[sqlx(rename)]`.
const COLUMNS: &str = "id, user_id, title, bpm, arrangement, created_at, updated_at";

/// Provides CRUD operations for DAW projects.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project, filling in the title, BPM and arrangement defaults.
    pub async fn create(
        pool: &PgPool,
        user_id: DbId,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (user_id, title, bpm, arrangement)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .bind(input.title.as_deref().unwrap_or(DEFAULT_PROJECT_TITLE))
            .bind(input.bpm.unwrap_or(DEFAULT_PROJECT_BPM))
            .bind(input.arrangement.clone().unwrap_or_else(arrangement::empty))
            .fetch_one(pool)
            .await
    }

    /// Find a project by its internal ID, regardless of owner.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE id = $1");
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// All projects owned by `user_id`, most recently touched first.
    pub async fn list_by_owner(pool: &PgPool, user_id: DbId) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects WHERE user_id = $1
             ORDER BY updated_at DESC, id DESC"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Update a project owned by `owner_id`. Only non-`None` fields are applied;
    /// the `updated_at` trigger refreshes `last_updated`.
    ///
    /// Returns `None` if the project does not exist or belongs to someone else.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                title = COALESCE($3, title),
                bpm = COALESCE($4, bpm),
                arrangement = COALESCE($5, arrangement)
             WHERE id = $1 AND user_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(owner_id)
            .bind(&input.title)
            .bind(input.bpm)
            .bind(&input.arrangement)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project owned by `owner_id` together with its stems.
    ///
    /// Returns the blob keys of the removed stems so the caller can release
    /// storage, or `None` if the project does not exist or is not owned.
    pub async fn delete(
        pool: &PgPool,
        id: DbId,
        owner_id: DbId,
    ) -> Result<Option<Vec<String>>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let locked: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM projects WHERE id = $1 AND user_id = $2 FOR UPDATE")
                .bind(id)
                .bind(owner_id)
                .fetch_optional(&mut *tx)
                .await?;
        if locked.is_none() {
            return Ok(None);
        }

        let keys: Vec<(String,)> =
            sqlx::query_as("SELECT file FROM project_files WHERE project_id = $1")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;

        sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(Some(keys.into_iter().map(|(key,)| key).collect()))
    }
}
