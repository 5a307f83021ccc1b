//! Handler for health check endpoint.

use axum::{Json, extract::State};

use crate::api::dto::health::{HealthChecks, HealthResponse};
use crate::state::AppState;

/// Returns service status and the active pipeline settings.
///
/// # Endpoint
///
/// `GET /health`
///
/// The service keeps no connections open, so this never reports degraded;
/// the provider is only contacted while a message is being rewritten.
///
/// # Response
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "checks": {
///     "extraction_mode": "pattern",
///     "relay": "telex",
///     "max_concurrent_shorten": 16,
///     "shorten_timeout_ms": 10000
///   }
/// }
/// ```
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    let limits = state.rewrite_service.limits();

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: HealthChecks {
            extraction_mode: state.extractor.mode().to_string(),
            relay: state.notifier.name().to_string(),
            max_concurrent_shorten: limits.max_concurrency,
            shorten_timeout_ms: limits.call_timeout.as_millis() as u64,
        },
    })
}
