//! Telex channel relay.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::domain::providers::Notifier;
use crate::error::RelayError;

/// Default Telex API base URL.
pub const DEFAULT_TELEX_URL: &str = "https://api.telex.im";

#[derive(Serialize)]
struct MessageUpdate<'a> {
    content: &'a str,
}

/// [`Notifier`] that edits the original message via
/// `PUT {base}/channels/{channel_id}/messages`.
#[derive(Clone)]
pub struct TelexNotifier {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl TelexNotifier {
    /// Creates a notifier for the given API base URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, RelayError> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(5))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout,
        })
    }

    fn channel_url(&self, channel_id: &str) -> String {
        format!(
            "{}/channels/{}/messages",
            self.base_url.trim_end_matches('/'),
            channel_id
        )
    }
}

#[async_trait]
impl Notifier for TelexNotifier {
    async fn relay(&self, channel_id: &str, content: &str) -> Result<(), RelayError> {
        let request = self
            .client
            .put(self.channel_url(channel_id))
            .json(&MessageUpdate { content })
            .send();

        let response = tokio::time::timeout(self.timeout, request)
            .await
            .map_err(|_| RelayError::Timeout(channel_id.to_string()))??;

        let status = response.status();
        if !status.is_success() {
            return Err(RelayError::Status {
                channel_id: channel_id.to_string(),
                status: status.as_u16(),
            });
        }

        tracing::debug!(channel_id, "Relayed rewritten message");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "telex"
    }
}
