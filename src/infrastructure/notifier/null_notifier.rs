//! No-op notifier for disabled relay.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::providers::Notifier;
use crate::error::RelayError;

/// A notifier that drops every message.
///
/// Used when `RELAY_ENABLED=false` and in tests that do not care about relay.
pub struct NullNotifier;

impl NullNotifier {
    /// Creates a new NullNotifier instance.
    pub fn new() -> Self {
        debug!("Using NullNotifier (relay disabled)");
        Self
    }
}

impl Default for NullNotifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Notifier for NullNotifier {
    async fn relay(&self, _channel_id: &str, _content: &str) -> Result<(), RelayError> {
        Ok(())
    }

    fn name(&self) -> &'static str {
        "disabled"
    }
}
