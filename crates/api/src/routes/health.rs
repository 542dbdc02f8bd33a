use axum::extract::State;
use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when every dependency answered, otherwise `degraded`.
    pub status: &'static str,
    pub version: &'static str,
    pub database: bool,
    pub media: bool,
}

/// GET /health
///
/// Probes the database and the blob store. Answers 503 when either is down
/// so load balancers stop routing to this instance.
async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let (database, media) = tokio::join!(
        soundloft_db::health_check(&state.pool),
        state.blobs.ping(),
    );
    if let Err(e) = &database {
        tracing::warn!(error = %e, "Health check: database unreachable");
    }
    if let Err(e) = &media {
        tracing::warn!(error = %e, "Health check: media store unavailable");
    }

    let healthy = database.is_ok() && media.is_ok();
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            database: database.is_ok(),
            media: media.is_ok(),
        }),
    )
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
