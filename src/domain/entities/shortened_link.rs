//! Result of a successful shortening call.

use chrono::{DateTime, Utc};
use serde_json::Value;

/// A long URL paired with the short URL issued by the provider.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortenedLink {
    pub long_url: String,
    pub short_url: String,
    /// Provider-side identifier (Bitly `id`, e.g. `bit.ly/abc`), when returned.
    pub provider_id: Option<String>,
    /// Raw provider response payload.
    pub metadata: Value,
    pub shortened_at: DateTime<Utc>,
}

impl ShortenedLink {
    /// Creates a new shortened link stamped with the current time.
    pub fn new(
        long_url: impl Into<String>,
        short_url: impl Into<String>,
        provider_id: Option<String>,
        metadata: Value,
    ) -> Self {
        Self {
            long_url: long_url.into(),
            short_url: short_url.into(),
            provider_id,
            metadata,
            shortened_at: Utc::now(),
        }
    }
}
