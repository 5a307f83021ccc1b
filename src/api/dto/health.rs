//! DTOs for the health endpoint.

use serde::Serialize;

/// Service health summary.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub checks: HealthChecks,
}

/// Static facts about the running pipeline.
#[derive(Debug, Serialize)]
pub struct HealthChecks {
    pub extraction_mode: String,
    pub relay: String,
    pub max_concurrent_shorten: usize,
    pub shorten_timeout_ms: u64,
}
