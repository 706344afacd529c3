//! HTTP surface — axum routing and JSON glue over `ChronyManager`.
//!
//! The handlers do request validation and response encoding only; every
//! operation with real semantics lives in the core components. All daemon
//! errors are reported in-band with a 200 status; only request validation
//! produces 400.

pub mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::routing::{get, put};
use axum::Router;
use tokio_util::sync::CancellationToken;

use crate::manager::ChronyManager;

/// Shared handler state.
pub type AppState = Arc<ChronyManager>;

/// Build the bridge's router over the given manager.
pub fn router(manager: AppState) -> Router {
    Router::new()
        .route(
            "/chrony/servers",
            get(handlers::list_servers)
                .put(handlers::set_servers)
                .delete(handlers::reset_servers),
        )
        .route("/chrony/servers/default", put(handlers::set_default_servers))
        .route("/chrony/status", get(handlers::status))
        .route("/chrony/version", get(handlers::chronyc_version))
        .route(
            "/chrony/server-mode",
            get(handlers::server_mode).put(handlers::set_server_mode),
        )
        .route("/health", get(handlers::health))
        .route("/version", get(handlers::app_version))
        .with_state(manager)
}

/// Bind `addr` and serve the bridge until the token is cancelled.
pub async fn serve(
    manager: AppState,
    addr: SocketAddr,
    cancel: CancellationToken,
) -> std::io::Result<()> {
    let app = router(manager);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(addr = %addr, "chrony-bridge HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel.cancelled_owned())
        .await?;

    tracing::info!("chrony-bridge HTTP server stopped");
    Ok(())
}
