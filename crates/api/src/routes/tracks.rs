//! Route definitions for the `/tracks` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{social, tracks};
use crate::state::AppState;

/// Routes mounted at `/tracks`.
///
/// ```text
/// GET, POST               /               -> list_tracks, create_track
/// GET, PUT, PATCH, DELETE /{id}           -> get_track, replace_track, patch_track, delete_track
/// POST                    /{id}/like      -> toggle_like
/// POST                    /{id}/repost    -> toggle_repost
/// POST                    /{id}/listen    -> record_listen
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(tracks::list_tracks).post(tracks::create_track))
        .route(
            "/{id}",
            get(tracks::get_track)
                .put(tracks::replace_track)
                .patch(tracks::patch_track)
                .delete(tracks::delete_track),
        )
        .route("/{id}/like", post(social::toggle_like))
        .route("/{id}/repost", post(social::toggle_repost))
        .route("/{id}/listen", post(social::record_listen))
}
