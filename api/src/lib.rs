use std::sync::Arc;

mod app;
mod error_handler;
mod middleware_layer;
mod routes;

#[cfg(test)]
mod tests;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tokio::signal;
use tracing::{error, info};

pub use crate::app::app_state::{AppState, ConfigError, ServerConfig};
pub use crate::error_handler::{AppError, AppResult};

use crate::middleware_layer::{cors::allow_any_origin, request_id::ensure_request_id};
use crate::routes::{
    frontend::frontend_route::{app_js_route, index_route},
    health::health_route::health_route,
    notes::serve_note_route::{download_note_route, view_note_route},
    search::search_route::search_route,
};

/// Builds the HTTP router over an already initialized state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_route))
        .route("/static/app.js", get(app_js_route))
        .route("/healthz", get(health_route))
        .route("/api/search", post(search_route))
        .route("/pdf/{*filename}", get(view_note_route))
        .route("/download/{*filename}", get(download_note_route))
        .with_state(state)
        .layer(middleware::from_fn(ensure_request_id))
        .layer(middleware::from_fn(allow_any_origin))
}

/// Binds `server.address` and serves until Ctrl+C.
pub async fn start(state: AppState, server: &ServerConfig) -> Result<(), AppError> {
    let app = router(Arc::new(state));

    let listener = tokio::net::TcpListener::bind(&server.address)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %server.address, "api listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("shutdown signal received"),
        Err(err) => {
            error!(error = %err, "failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
