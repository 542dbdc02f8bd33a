//! Handlers for DAW projects and their stems.
//!
//! Everything here is scoped to the caller: another user's project id is
//! indistinguishable from one that does not exist.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::Value;
use soundloft_core::ownership::ensure_owner;
use soundloft_core::storage::{self, BlobFolder};
use soundloft_core::types::{DbId, DurationSecs};
use soundloft_core::{arrangement, catalog};
use soundloft_db::models::project::{CreateProject, Project, UpdateProject};
use soundloft_db::models::project_file::CreateProjectFile;
use soundloft_db::repositories::{ProjectFileRepo, ProjectRepo};
use validator::ValidationErrors;

use crate::error::{add_core_error, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::projections::ProjectFileResponse;
use crate::state::AppState;
use crate::upload::{StagedBlobs, UploadForm};

// ---------------------------------------------------------------------------
// Projects
// ---------------------------------------------------------------------------

/// GET /api/v1/projects
///
/// The caller's projects, most recently updated first.
pub async fn list_projects(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<Vec<Project>>> {
    let projects = ProjectRepo::list_by_owner(&state.pool, auth.user_id).await?;
    Ok(Json(projects))
}

/// POST /api/v1/projects
pub async fn create_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<Project>)> {
    validate_fields(
        input.title.as_deref(),
        input.bpm,
        input.arrangement.as_ref(),
    )?;

    let project = ProjectRepo::create(&state.pool, auth.user_id, &input).await?;
    tracing::info!(project_id = project.id, user_id = auth.user_id, "Project created");

    Ok((StatusCode::CREATED, Json(project)))
}

/// GET /api/v1/projects/{id}
pub async fn get_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Project>> {
    let project = load_project(&state, auth, id).await?;
    Ok(Json(project))
}

/// PUT|PATCH /api/v1/projects/{id}
///
/// Replaces any subset of title, bpm and arrangement. `null` leaves a field as is.
pub async fn update_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<Project>> {
    validate_fields(
        input.title.as_deref(),
        input.bpm,
        input.arrangement.as_ref(),
    )?;

    let project = ProjectRepo::update(&state.pool, id, auth.user_id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("project", id))?;

    tracing::debug!(
        project_id = id,
        tracks = arrangement::track_count(&project.arrangement),
        "Project saved"
    );
    Ok(Json(project))
}

/// DELETE /api/v1/projects/{id}
///
/// Deletes the project and its stems, then their blobs.
pub async fn delete_project(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let keys = ProjectRepo::delete(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("project", id))?;

    let stems = keys.len();
    storage::remove_all(state.blobs.as_ref(), keys).await;

    tracing::info!(project_id = id, user_id = auth.user_id, stems, "Project deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Stems
// ---------------------------------------------------------------------------

/// GET /api/v1/projects/{id}/files
pub async fn list_files(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<ProjectFileResponse>>> {
    let project = load_project(&state, auth, id).await?;
    let files = ProjectFileRepo::list_by_project(&state.pool, project.id).await?;

    let blobs = state.blobs.as_ref();
    Ok(Json(
        files
            .into_iter()
            .map(|file| ProjectFileResponse::new(file, blobs))
            .collect(),
    ))
}

/// POST /api/v1/projects/{id}/upload
///
/// Multipart fields: `file` (required), `name`, `duration`.
pub async fn upload_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<ProjectFileResponse>)> {
    let project = load_project(&state, auth, id).await?;

    let mut form = UploadForm::read(multipart).await?;
    let upload = form.require_file("file")?;
    let ext = catalog::audio_extension(&upload.file_name).map_err(AppError::for_field("file"))?;
    let duration: Option<DurationSecs> = form.number("duration")?;
    if let Some(duration) = duration {
        catalog::validate_duration(duration).map_err(AppError::for_field("duration"))?;
    }
    let name = match form.text("name") {
        Some(name) => {
            catalog::validate_title(name).map_err(AppError::for_field("name"))?;
            Some(name.to_string())
        }
        None => None,
    };

    let mut staged = StagedBlobs::new(state.blobs.clone());
    let key = staged.put(BlobFolder::ProjectFiles, &ext, &upload.data).await?;

    let input = CreateProjectFile {
        name,
        file: key,
        duration,
    };
    let file = match ProjectFileRepo::create(&state.pool, project.id, &input).await {
        Ok(Some(file)) => {
            staged.commit();
            file
        }
        Ok(None) => {
            staged.discard().await;
            return Err(AppError::not_found("project", id));
        }
        Err(e) => {
            staged.discard().await;
            return Err(e.into());
        }
    };

    tracing::info!(project_id = project.id, file_id = file.id, "Stem uploaded");
    Ok((
        StatusCode::CREATED,
        Json(ProjectFileResponse::new(file, state.blobs.as_ref())),
    ))
}

/// DELETE /api/v1/projects/{id}/files/{file_id}
pub async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((id, file_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    let project = load_project(&state, auth, id).await?;

    let file = ProjectFileRepo::delete(&state.pool, project.id, file_id)
        .await?
        .ok_or_else(|| AppError::not_found("project_file", file_id))?;
    storage::remove_all(state.blobs.as_ref(), Some(file.file)).await;

    tracing::info!(project_id = id, file_id, "Stem deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn load_project(state: &AppState, auth: AuthUser, id: DbId) -> AppResult<Project> {
    let row = ProjectRepo::find_by_id(&state.pool, id).await?;
    Ok(ensure_owner("project", id, row, auth.user_id)?)
}

fn validate_fields(
    title: Option<&str>,
    bpm: Option<i32>,
    doc: Option<&Value>,
) -> AppResult<()> {
    let mut errors = ValidationErrors::new();

    if let Some(Err(e)) = title.map(catalog::validate_title) {
        add_core_error(&mut errors, "title", e);
    }
    if let Some(Err(e)) = bpm.map(catalog::validate_bpm) {
        add_core_error(&mut errors, "bpm", e);
    }
    if let Some(Err(e)) = doc.map(arrangement::validate) {
        add_core_error(&mut errors, "arrangement", e);
    }

    if errors.errors().is_empty() {
        Ok(())
    } else {
        Err(AppError::Fields(errors))
    }
}
