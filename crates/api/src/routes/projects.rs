//! Route definitions for the `/projects` resource.

use axum::routing::{delete, get, post};
use axum::Router;

use crate::handlers::projects;
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET, POST               /                        -> list_projects, create_project
/// GET, PUT, PATCH, DELETE /{id}                    -> get_project, update_project, delete_project
/// GET                     /{id}/files              -> list_files
/// POST                    /{id}/upload             -> upload_file
/// DELETE                  /{id}/files/{file_id}    -> delete_file
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(projects::list_projects).post(projects::create_project),
        )
        .route(
            "/{id}",
            get(projects::get_project)
                .put(projects::update_project)
                .patch(projects::update_project)
                .delete(projects::delete_project),
        )
        .route("/{id}/files", get(projects::list_files))
        .route("/{id}/upload", post(projects::upload_file))
        .route("/{id}/files/{file_id}", delete(projects::delete_file))
}
