//! HTTP server wiring for the Sluice gateway.
//!
//! Builds the axum router, binds the listener, and serves the JSON API
//! with a fully open CORS policy.

use axum::Router;
use axum::routing::get;
use sluice_core::SluiceConfig;
use sluice_core::relay::StreamRelay;
use sluice_core::resolve::MediaResolver;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::handlers::{api_download, api_resolve, api_stream, diagnostics};

/// Shared handler context.
///
/// Holds only cloned client handles; there is no mutable state shared
/// between requests, so no locks are needed.
#[derive(Clone)]
pub struct AppState {
    /// Metadata resolver for `/api/tiktok`
    pub resolver: MediaResolver,
    /// Byte-stream relay for `/api/stream` and `/api/download`
    pub relay: StreamRelay,
}

impl AppState {
    /// Builds the resolver and relay from configuration.
    pub fn new(config: &SluiceConfig) -> Self {
        Self {
            resolver: MediaResolver::new(&config.upstream),
            relay: StreamRelay::new(&config.upstream),
        }
    }
}

/// Builds the gateway router with all routes and the open CORS layer.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/tiktok", get(api_resolve))
        .route("/api/stream", get(api_stream))
        .route("/api/download", get(api_download))
        .route("/test", get(diagnostics))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Runs the gateway server until the process is stopped.
///
/// # Errors
/// Returns an error if the listener cannot bind or the server fails
/// while serving.
pub async fn run_server(config: SluiceConfig) -> std::io::Result<()> {
    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    let app = build_router(AppState::new(&config));

    info!("Sluice gateway listening on http://{bind_address}");
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
