//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET /health`      - Health check
//! - `/api/shorties/*`  - Shorty resource API
//!
//! # Middleware
//!
//! - Structured request/response tracing
//! - Trailing-slash normalization

use crate::api;
use crate::api::handlers::health_handler;
use crate::state::AppState;
use axum::Router;
use axum::routing::get;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::trace::TraceLayer;

/// Constructs the application router with all routes and middleware.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    let router = Router::new()
        .route("/health", get(health_handler))
        .nest("/api/shorties", api::routes::shorty_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
