//! HTTP API serving extracted homepage records.
//!
//! | Route | Description |
//! |-------|-------------|
//! | `GET /` | Liveness banner |
//! | `GET /health`, `GET /api/health` | Health check with timestamp |
//! | `GET /api/news[?diagnostics=true]` | Fetch the homepage and return its records |
//!
//! `/api/*` is rate limited per client; every route sits behind a CORS
//! allow-list.

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::Result;
use crate::scrapers::krishijagran::HttpSource;

pub mod app;
pub mod routes;

pub use app::{App, AppState, build_app};

/// Bind to the configured port and serve until Ctrl-C.
pub async fn serve(config: &AppConfig) -> Result<()> {
    let source = HttpSource::new(config)?;
    let app = build_app(config, source)?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, source = %config.source_url, "Server running");
    info!("Health check: http://localhost:{}/health", config.server.port);

    axum::serve(
        listener,
        app.router()
            .into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    drop(app);
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for Ctrl-C; shutting down");
    }
}
