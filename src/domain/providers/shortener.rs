//! Trait for the external link-shortening provider.

use crate::domain::entities::ShortenedLink;
use crate::error::ShortenProviderError;
use async_trait::async_trait;

/// Maps one long URL to a short URL.
///
/// Implementations perform exactly one outbound call per invocation and keep
/// no state between calls: no caching, no retries.
///
/// # Implementations
///
/// - [`crate::infrastructure::shortener::BitlyShortener`] - Bitly v4 API
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LinkShortener: Send + Sync {
    /// Shortens `url`.
    ///
    /// The URL is expected to be non-empty and already recognised as a link;
    /// no further validation is performed.
    ///
    /// # Errors
    ///
    /// Returns [`ShortenProviderError`] on transport failure, a non-2xx
    /// response, or a payload without a short link.
    async fn shorten(&self, url: &str) -> Result<ShortenedLink, ShortenProviderError>;
}
