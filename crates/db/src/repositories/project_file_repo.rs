//! Repository for the `project_files` table.
//!
//! Every mutation also bumps the parent project's `updated_at` so that
//! `last_updated` reflects stem changes.

use sqlx::{PgConnection, PgPool};
use soundloft_core::catalog::DEFAULT_STEM_NAME;
use soundloft_core::types::DbId;

use crate::models::project_file::{CreateProjectFile, ProjectFile};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, project_id, name, file, duration, created_at, updated_at";

/// Provides create/list/delete for project stems.
pub struct ProjectFileRepo;

impl ProjectFileRepo {
    /// Insert a stem and touch the parent project in one transaction.
    ///
    /// The project row is locked first (the touch updates it anyway), so a
    /// project deleted in the meantime yields `None` rather than a foreign
    /// key violation, and a delete that comes later waits for this insert.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        input: &CreateProjectFile,
    ) -> Result<Option<ProjectFile>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let project: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM projects WHERE id = $1 FOR NO KEY UPDATE")
                .bind(project_id)
                .fetch_optional(&mut *tx)
                .await?;
        if project.is_none() {
            return Ok(None);
        }

        let query = format!(
            "INSERT INTO project_files (project_id, name, file, duration)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        let file = sqlx::query_as::<_, ProjectFile>(&query)
            .bind(project_id)
            .bind(input.name.as_deref().unwrap_or(DEFAULT_STEM_NAME))
            .bind(&input.file)
            .bind(input.duration)
            .fetch_one(&mut *tx)
            .await?;

        touch_project(&mut tx, project_id).await?;
        tx.commit().await?;
        Ok(Some(file))
    }

    /// Stems of a project, newest first.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<ProjectFile>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM project_files WHERE project_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ProjectFile>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Remove one stem from a project, returning the removed row.
    ///
    /// Returns `None` if no stem with `file_id` belongs to `project_id`.
    pub async fn delete(
        pool: &PgPool,
        project_id: DbId,
        file_id: DbId,
    ) -> Result<Option<ProjectFile>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "DELETE FROM project_files WHERE id = $1 AND project_id = $2 RETURNING {COLUMNS}"
        );
        let removed = sqlx::query_as::<_, ProjectFile>(&query)
            .bind(file_id)
            .bind(project_id)
            .fetch_optional(&mut *tx)
            .await?;

        if removed.is_some() {
            touch_project(&mut tx, project_id).await?;
        }
        tx.commit().await?;
        Ok(removed)
    }
}

/// Bump the parent project's `updated_at`.
async fn touch_project(conn: &mut PgConnection, project_id: DbId) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE projects SET updated_at = NOW() WHERE id = $1")
        .bind(project_id)
        .execute(conn)
        .await?;
    Ok(())
}
