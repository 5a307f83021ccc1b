//! Bitly v4 shortening client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

use crate::domain::entities::ShortenedLink;
use crate::domain::providers::LinkShortener;
use crate::error::ShortenProviderError;

/// Default Bitly shorten endpoint.
pub const DEFAULT_BITLY_URL: &str = "https://api-ssl.bitly.com/v4/shorten";

#[derive(Serialize)]
struct ShortenBody<'a> {
    long_url: &'a str,
}

/// [`LinkShortener`] backed by the Bitly `POST /v4/shorten` endpoint.
///
/// The access token is read once at startup and sent as a bearer credential
/// with every call.
#[derive(Clone)]
pub struct BitlyShortener {
    client: Client,
    endpoint: String,
    access_token: String,
}

impl BitlyShortener {
    /// Creates a client with its own connection pool and request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        endpoint: impl Into<String>,
        access_token: impl Into<String>,
        request_timeout: Duration,
    ) -> Result<Self, ShortenProviderError> {
        let client = Client::builder()
            .timeout(request_timeout)
            .connect_timeout(Duration::from_secs(5))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;

        Ok(Self::with_client(client, endpoint, access_token))
    }

    /// Creates a client that reuses an existing [`Client`].
    pub fn with_client(
        client: Client,
        endpoint: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            access_token: access_token.into(),
        }
    }
}

#[async_trait]
impl LinkShortener for BitlyShortener {
    async fn shorten(&self, url: &str) -> Result<ShortenedLink, ShortenProviderError> {
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.access_token)
            .json(&ShortenBody { long_url: url })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(url, status = status.as_u16(), "Bitly rejected shorten request");
            return Err(ShortenProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| ShortenProviderError::Malformed(e.to_string()))?;

        parse_response(url, payload)
    }
}

/// Pulls the short link out of a Bitly response payload.
fn parse_response(long_url: &str, payload: Value) -> Result<ShortenedLink, ShortenProviderError> {
    let short_url = payload
        .get("link")
        .and_then(Value::as_str)
        .filter(|link| !link.is_empty())
        .ok_or_else(|| {
            ShortenProviderError::Malformed("response has no 'link' field".to_string())
        })?
        .to_string();

    let provider_id = payload
        .get("id")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(ShortenedLink::new(long_url, short_url, provider_id, payload))
}
