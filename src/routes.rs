//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `POST /shortenURL`, `POST /shortenUrl` - Message rewrite webhook
//! - `GET  /health`                         - Service status
//! - `GET  /integration`                    - Integration descriptor file
//!
//! # Middleware
//!
//! - **Tracing** - Structured request/response logging
//! - **CORS** - Any origin
//! - **Path normalization** - Trailing slash handling

use crate::api;
use crate::api::middleware::{cors, tracing};
use crate::state::AppState;
use axum::Router;
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};
use tower_http::services::ServeFile;

/// Constructs the router with all routes and middleware, without path
/// normalization.
///
/// The integration descriptor is served verbatim from
/// [`AppState::integration_file`]; a missing file yields 404.
pub fn router(state: AppState) -> Router {
    let integration = ServeFile::new(&state.integration_file);

    Router::new()
        .merge(api::routes::webhook_routes())
        .route_service("/integration", integration)
        .with_state(state)
        .layer(cors::layer())
        .layer(tracing::layer())
}

/// Constructs the application router, trimming trailing slashes before routing.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
