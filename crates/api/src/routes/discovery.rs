//! Route definitions for cross-user track listings.

use axum::routing::get;
use axum::Router;

use crate::handlers::{feed, social};
use crate::state::AppState;

/// Routes mounted at the API root.
///
/// ```text
/// GET /feed      -> feed
/// GET /search    -> search
/// GET /liked     -> list_liked
/// GET /reposted  -> list_reposted
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/feed", get(feed::feed))
        .route("/search", get(feed::search))
        .route("/liked", get(social::list_liked))
        .route("/reposted", get(social::list_reposted))
}
