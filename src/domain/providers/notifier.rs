//! Trait for relaying a rewritten message back to its channel.

use crate::error::RelayError;
use async_trait::async_trait;

/// Pushes rewritten content to the channel the message came from.
///
/// # Implementations
///
/// - [`crate::infrastructure::notifier::TelexNotifier`] - Telex channel API
/// - [`crate::infrastructure::notifier::NullNotifier`] - Relay disabled
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends `content` to `channel_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError`] if the channel could not be updated.
    async fn relay(&self, channel_id: &str, content: &str) -> Result<(), RelayError>;

    /// Short name used in logs and health output.
    fn name(&self) -> &'static str;
}
