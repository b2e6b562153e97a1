//! HTTP surface: `POST /extract`.

mod error;
mod handlers;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::post;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use docscan_core::{DocumentScanner, ServerConfig};

pub use error::ApiError;

/// Shared state for request handlers.
pub struct AppState {
    pub scanner: DocumentScanner,
    pub server: ServerConfig,
}

/// Build the router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.server.max_upload_bytes;

    Router::new()
        .route("/extract", post(handlers::extract))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
