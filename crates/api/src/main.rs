use std::sync::Arc;

use soundloft_core::storage::LocalBlobStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use soundloft_api::config::ServerConfig;
use soundloft_api::router::build_app_router;
use soundloft_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    let addr = config.bind_addr();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = soundloft_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    soundloft_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    soundloft_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    let blobs = LocalBlobStore::new(&config.media.root, &config.media.base_url());
    tokio::fs::create_dir_all(blobs.root())
        .await
        .expect("Failed to create MEDIA_ROOT");
    tracing::info!(
        media_root = ?blobs.root(),
        max_upload_bytes = config.media.max_upload_bytes,
        "Media store ready"
    );

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        blobs: Arc::new(blobs),
    };
    let app = build_app_router(state, &config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");
    tracing::info!(%addr, "Soundloft API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    tracing::info!("Shut down cleanly");
}

/// `LOG_FORMAT=json` switches to one JSON object per line for log shipping.
fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "soundloft_api=debug,soundloft_db=info,soundloft_core=info,tower_http=debug".into()
    });
    let registry = tracing_subscriber::registry().with(filter);

    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Resolve on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Ctrl-C handler failed");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "SIGTERM handler failed");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("Ctrl-C received, draining connections"),
        () = terminate => tracing::info!("SIGTERM received, draining connections"),
    }
}
