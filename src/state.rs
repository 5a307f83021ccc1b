//! Shared state injected into every handler.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::application::services::{LinkExtractor, RewriteService};
use crate::domain::providers::{LinkShortener, Notifier};

/// Application state shared across requests.
///
/// Holds no mutable data: each request builds its own occurrences and result.
#[derive(Clone)]
pub struct AppState {
    pub extractor: LinkExtractor,
    pub rewrite_service: Arc<RewriteService<dyn LinkShortener>>,
    pub notifier: Arc<dyn Notifier>,
    /// Upper bound on a relay call, independent of the notifier's own client timeout.
    pub relay_timeout: Duration,
    pub integration_file: PathBuf,
}

impl AppState {
    pub fn new(
        extractor: LinkExtractor,
        rewrite_service: Arc<RewriteService<dyn LinkShortener>>,
        notifier: Arc<dyn Notifier>,
        relay_timeout: Duration,
        integration_file: PathBuf,
    ) -> Self {
        Self {
            extractor,
            rewrite_service,
            notifier,
            relay_timeout,
            integration_file,
        }
    }
}
