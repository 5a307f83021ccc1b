//! Webhook route configuration.

use crate::api::handlers::{health_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Webhook and status routes.
///
/// # Endpoints
///
/// - `POST /shortenURL` - Rewrite links in a message
/// - `POST /shortenUrl` - Alias of `/shortenURL`
/// - `GET  /health`     - Service status
pub fn webhook_routes() -> Router<AppState> {
    Router::new()
        .route("/shortenURL", post(shorten_handler))
        .route("/shortenUrl", post(shorten_handler))
        .route("/health", get(health_handler))
}
