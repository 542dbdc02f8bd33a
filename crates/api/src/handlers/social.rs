//! Handlers for likes, reposts and play counts.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;
use soundloft_core::types::DbId;
use soundloft_db::models::reaction::Reaction;
use soundloft_db::repositories::{ReactionRepo, TrackRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::projections::TrackResponse;
use crate::query::PaginationParams;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub liked: bool,
    pub likes_count: i64,
}

#[derive(Debug, Serialize)]
pub struct RepostResponse {
    pub reposted: bool,
    pub reposts_count: i64,
}

#[derive(Debug, Serialize)]
pub struct ListenResponse {
    pub listens_count: i64,
}

/// POST /api/v1/tracks/{id}/like
pub async fn toggle_like(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(track_id): Path<DbId>,
) -> AppResult<Json<LikeResponse>> {
    let outcome = ReactionRepo::toggle(&state.pool, Reaction::Like, auth.user_id, track_id)
        .await?
        .ok_or_else(|| AppError::not_found("track", track_id))?;

    tracing::info!(track_id, user_id = auth.user_id, liked = outcome.active, "Like toggled");
    Ok(Json(LikeResponse {
        liked: outcome.active,
        likes_count: outcome.count,
    }))
}

/// POST /api/v1/tracks/{id}/repost
pub async fn toggle_repost(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(track_id): Path<DbId>,
) -> AppResult<Json<RepostResponse>> {
    let outcome = ReactionRepo::toggle(&state.pool, Reaction::Repost, auth.user_id, track_id)
        .await?
        .ok_or_else(|| AppError::not_found("track", track_id))?;

    tracing::info!(track_id, user_id = auth.user_id, reposted = outcome.active, "Repost toggled");
    Ok(Json(RepostResponse {
        reposted: outcome.active,
        reposts_count: outcome.count,
    }))
}

/// POST /api/v1/tracks/{id}/listen
///
/// Counts one play. Repeated calls from the same user all count.
pub async fn record_listen(
    State(state): State<AppState>,
    _auth: AuthUser,
    Path(track_id): Path<DbId>,
) -> AppResult<Json<ListenResponse>> {
    let listens_count = TrackRepo::record_listen(&state.pool, track_id)
        .await?
        .ok_or_else(|| AppError::not_found("track", track_id))?;
    Ok(Json(ListenResponse { listens_count }))
}

/// GET /api/v1/liked
///
/// Tracks the caller liked, most recently liked first.
pub async fn list_liked(
    state: State<AppState>,
    auth: AuthUser,
    params: Query<PaginationParams>,
) -> AppResult<Json<Vec<TrackResponse>>> {
    list_reacted(state, auth, params, Reaction::Like).await
}

/// GET /api/v1/reposted
///
/// Tracks the caller reposted, most recently reposted first.
pub async fn list_reposted(
    state: State<AppState>,
    auth: AuthUser,
    params: Query<PaginationParams>,
) -> AppResult<Json<Vec<TrackResponse>>> {
    list_reacted(state, auth, params, Reaction::Repost).await
}

async fn list_reacted(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<PaginationParams>,
    reaction: Reaction,
) -> AppResult<Json<Vec<TrackResponse>>> {
    let (limit, offset) = params.resolve();
    let rows = TrackRepo::list_reacted(&state.pool, auth.user_id, reaction, limit, offset).await?;
    Ok(Json(TrackResponse::list(rows, state.blobs.as_ref())))
}
