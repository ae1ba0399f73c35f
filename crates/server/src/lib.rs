//! HTTP API for event registration
//!
//! Public routes list sessions and speakers and register attendees. Admin
//! routes, guarded by a shared password header, manage sessions and
//! speakers and read attendee data. Every route reads and writes through an
//! injected [`DocumentStore`](eventdesk_store::DocumentStore), so tests run
//! against an in-memory store while production talks to Firestore.
//!
//! Static frontend files are served from `FRONTEND_DIR` for any path the API
//! does not claim.

use std::path::Path;
use std::time::Duration;

use axum::{http::Method, Router};
use tokio::{
    net::TcpListener,
    signal::{self, ctrl_c},
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;

pub mod auth;
pub mod config;
pub mod error;
pub mod payload;
pub mod routes;
pub mod state;

pub use config::{Backend, Config, ConfigError};
pub use error::AppError;
pub use state::AppState;

/// API routes plus CORS and request tracing.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api(state.clone()))
        .layer(cors())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// [`router`] with the static frontend as fallback when `frontend_dir`
/// exists.
pub fn app(state: AppState, frontend_dir: &Path) -> Router {
    let router = router(state);
    if frontend_dir.is_dir() {
        info!(dir = %frontend_dir.display(), "Serving static files");
        router.fallback_service(ServeDir::new(frontend_dir))
    } else {
        info!(dir = %frontend_dir.display(), "Static directory not found, API-only mode");
        router
    }
}

/// Build the configured store and serve until Ctrl+C or SIGTERM.
pub async fn start_server(config: Config) -> anyhow::Result<()> {
    info!("Initializing state...");
    let state = AppState::from_config(&config)?;
    let app = app(state, &config.frontend_dir);

    let address = format!("0.0.0.0:{}", config.port);
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
        .max_age(Duration::from_secs(60 * 60))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
