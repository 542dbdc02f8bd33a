//! Handlers for the global feed and search listings.

use axum::extract::{Query, State};
use axum::Json;
use soundloft_core::search::{contains_pattern, normalize_query};
use soundloft_db::repositories::TrackRepo;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::projections::TrackResponse;
use crate::query::{PaginationParams, SearchParams};
use crate::state::AppState;

/// GET /api/v1/feed?limit=&offset=
///
/// Every user's tracks, newest first.
pub async fn feed(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<Vec<TrackResponse>>> {
    let (limit, offset) = params.resolve();
    let rows = TrackRepo::feed(&state.pool, auth.user_id, limit, offset).await?;
    Ok(Json(TrackResponse::list(rows, state.blobs.as_ref())))
}

/// GET /api/v1/search?q=&limit=&offset=
///
/// Case-insensitive substring match on title, genre and owner username.
/// A missing or blank `q` returns an empty list.
pub async fn search(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<SearchParams>,
) -> AppResult<Json<Vec<TrackResponse>>> {
    let Some(term) = normalize_query(params.q.as_deref()) else {
        return Ok(Json(Vec::new()));
    };

    let (limit, offset) = params.page().resolve();
    let rows = TrackRepo::search(
        &state.pool,
        auth.user_id,
        &contains_pattern(term),
        limit,
        offset,
    )
    .await?;

    tracing::debug!(user_id = auth.user_id, q = %term, hits = rows.len(), "Track search");
    Ok(Json(TrackResponse::list(rows, state.blobs.as_ref())))
}
