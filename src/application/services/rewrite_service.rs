//! Batch rewriting of every link occurrence in a message.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tokio::time::timeout;

use crate::domain::entities::{LinkOccurrence, RewriteOutcome, ShortenedLink};
use crate::domain::providers::LinkShortener;
use crate::error::{RewriteError, ShortenProviderError};

/// Limits applied to the outbound fan-out of one rewrite.
#[derive(Debug, Clone, Copy)]
pub struct RewriteLimits {
    /// Timeout for each individual shortening call.
    pub call_timeout: Duration,
    /// Maximum number of shortening calls in flight at once.
    pub max_concurrency: usize,
}

impl Default for RewriteLimits {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(10),
            max_concurrency: 16,
        }
    }
}

/// Shortens all occurrences of a message and reassembles it.
///
/// The batch is all-or-nothing: either every occurrence is replaced, or the
/// caller gets a [`RewriteError`] and no rewritten text at all.
///
/// Shortening is treated as a pure function of the URL value, so duplicate
/// occurrences of the same URL resolve to the same short URL. Each occurrence
/// still gets its own call.
pub struct RewriteService<S: LinkShortener + ?Sized> {
    shortener: Arc<S>,
    limits: RewriteLimits,
}

impl<S: LinkShortener + ?Sized> RewriteService<S> {
    /// Creates a new rewrite service.
    pub fn new(shortener: Arc<S>, limits: RewriteLimits) -> Self {
        Self { shortener, limits }
    }

    pub fn limits(&self) -> RewriteLimits {
        self.limits
    }

    /// Rewrites `message`, replacing each occurrence with its short URL.
    ///
    /// # Algorithm
    ///
    /// 1. No occurrences: the message is returned unchanged, no calls issued
    /// 2. One shortening call per occurrence, run concurrently (bounded by
    ///    [`RewriteLimits::max_concurrency`], each bounded by
    ///    [`RewriteLimits::call_timeout`])
    /// 3. All calls are awaited; any failure fails the batch with the first
    ///    failing occurrence in scan order
    /// 4. Substitution by position, in scan order; text outside the
    ///    occurrences is copied byte for byte
    ///
    /// # Errors
    ///
    /// Returns [`RewriteError`] if any shortening call fails or times out.
    #[tracing::instrument(skip_all, fields(occurrences = occurrences.len()))]
    pub async fn rewrite(
        &self,
        message: &str,
        occurrences: &[LinkOccurrence],
    ) -> Result<RewriteOutcome, RewriteError> {
        if occurrences.is_empty() {
            return Ok(RewriteOutcome::unchanged(message));
        }

        let call_timeout = self.limits.call_timeout;
        let urls: Vec<String> = occurrences.iter().map(|o| o.url.clone()).collect();
        let results: Vec<Result<ShortenedLink, ShortenProviderError>> = stream::iter(urls)
            .map(|url| async move { self.shorten_one(&url, call_timeout).await })
            .buffered(self.limits.max_concurrency.max(1))
            .collect()
            .await;

        let failed = results.iter().filter(|r| r.is_err()).count();
        let mut links = Vec::with_capacity(results.len());

        for (occurrence, result) in occurrences.iter().zip(results) {
            match result {
                Ok(link) => links.push(link),
                Err(source) => {
                    tracing::error!(
                        input = %message,
                        url = %occurrence.url,
                        index = occurrence.index,
                        failed,
                        total = occurrences.len(),
                        error = %source,
                        "Shortening failed, discarding batch"
                    );
                    return Err(RewriteError {
                        index: occurrence.index,
                        url: occurrence.url.clone(),
                        original_message: message.to_string(),
                        failed,
                        total: occurrences.len(),
                        source,
                    });
                }
            }
        }

        let rewritten = substitute(message, occurrences, &links);
        tracing::debug!(links = links.len(), "Message rewritten");

        Ok(RewriteOutcome::rewritten(rewritten, links))
    }

    async fn shorten_one(
        &self,
        url: &str,
        call_timeout: Duration,
    ) -> Result<ShortenedLink, ShortenProviderError> {
        match timeout(call_timeout, self.shortener.shorten(url)).await {
            Ok(result) => result,
            Err(_) => Err(ShortenProviderError::Timeout(call_timeout)),
        }
    }
}

/// Replaces each located occurrence with the short URL at the same index.
///
/// Occurrences are expected in scan order with non-overlapping spans; one
/// that overlaps an earlier replacement, or has no span, is skipped. Encoded
/// spans receive an escaped short URL.
fn substitute(message: &str, occurrences: &[LinkOccurrence], links: &[ShortenedLink]) -> String {
    let mut output = String::with_capacity(message.len());
    let mut cursor = 0;

    for (occurrence, link) in occurrences.iter().zip(links) {
        let Some(span) = occurrence.span.as_ref() else {
            continue;
        };
        if span.start < cursor || span.end > message.len() {
            continue;
        }
        output.push_str(&message[cursor..span.start]);
        output.push_str(&occurrence.replacement(&link.short_url));
        cursor = span.end;
    }

    output.push_str(&message[cursor..]);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::{ExtractionMode, LinkExtractor};
    use crate::domain::entities::RewriteStatus;
    use crate::domain::providers::MockLinkShortener;
    use async_trait::async_trait;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn link(long: &str, short: &str) -> ShortenedLink {
        ShortenedLink::new(long, short, None, json!({ "link": short }))
    }

    fn service(mock: MockLinkShortener) -> RewriteService<MockLinkShortener> {
        RewriteService::new(Arc::new(mock), RewriteLimits::default())
    }

    fn pattern(message: &str) -> Vec<LinkOccurrence> {
        LinkExtractor::new(ExtractionMode::Pattern).extract(message)
    }

    #[tokio::test]
    async fn test_no_occurrences_issues_no_calls() {
        let mut mock = MockLinkShortener::new();
        mock.expect_shorten().times(0);

        let message = "no links in here";
        let outcome = service(mock).rewrite(message, &[]).await.unwrap();

        assert_eq!(outcome.message, message);
        assert_eq!(outcome.status, RewriteStatus::Unchanged);
        assert!(outcome.links.is_empty());
    }

    #[tokio::test]
    async fn test_single_link_rewritten() {
        let mut mock = MockLinkShortener::new();
        mock.expect_shorten()
            .withf(|url| url == "http://x.com/a")
            .times(1)
            .returning(|url| Ok(link(url, "http://short/1")));

        let message = "check http://x.com/a";
        let outcome = service(mock)
            .rewrite(message, &pattern(message))
            .await
            .unwrap();

        assert_eq!(outcome.message, "check http://short/1");
        assert!(outcome.is_rewritten());
    }

    #[tokio::test]
    async fn test_non_link_text_preserved() {
        let mut mock = MockLinkShortener::new();
        mock.expect_shorten()
            .times(2)
            .returning(|url| Ok(link(url, &format!("https://bit.ly/{}", url.len()))));

        let message = "  first: https://example.com/one\n\tsecond:https://example.com/two!  ";
        let outcome = service(mock)
            .rewrite(message, &pattern(message))
            .await
            .unwrap();

        assert_eq!(
            outcome.message,
            "  first: https://bit.ly/23\n\tsecond:https://bit.ly/24  "
        );
    }

    #[tokio::test]
    async fn test_duplicate_urls_each_get_a_call() {
        let mut mock = MockLinkShortener::new();
        mock.expect_shorten()
            .withf(|url| url == "http://a.com")
            .times(2)
            .returning(|url| Ok(link(url, "http://s/a")));
        mock.expect_shorten()
            .withf(|url| url == "http://b.com")
            .times(1)
            .returning(|url| Ok(link(url, "http://s/b")));

        let message = "http://a.com then http://b.com then http://a.com";
        let outcome = service(mock)
            .rewrite(message, &pattern(message))
            .await
            .unwrap();

        assert_eq!(outcome.message, "http://s/a then http://s/b then http://s/a");
        assert_eq!(outcome.links.len(), 3);
    }

    #[tokio::test]
    async fn test_any_failure_fails_whole_batch() {
        let mut mock = MockLinkShortener::new();
        mock.expect_shorten()
            .withf(|url| url == "http://ok.com")
            .times(1)
            .returning(|url| Ok(link(url, "http://s/ok")));
        mock.expect_shorten()
            .withf(|url| url == "http://bad.com")
            .times(1)
            .returning(|_| {
                Err(ShortenProviderError::Status {
                    status: 500,
                    body: "boom".to_string(),
                })
            });

        let message = "http://ok.com and http://bad.com";
        let err = service(mock)
            .rewrite(message, &pattern(message))
            .await
            .unwrap_err();

        assert_eq!(err.url, "http://bad.com");
        assert_eq!(err.index, 1);
        assert_eq!(err.original_message, message);
        assert_eq!(err.failed, 1);
        assert_eq!(err.total, 2);
        assert!(matches!(err.source, ShortenProviderError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_first_failure_in_scan_order_is_reported() {
        let mut mock = MockLinkShortener::new();
        mock.expect_shorten()
            .returning(|url| Err(ShortenProviderError::Malformed(url.to_string())));

        let message = "http://one.com http://two.com http://three.com";
        let err = service(mock)
            .rewrite(message, &pattern(message))
            .await
            .unwrap_err();

        assert_eq!(err.index, 0);
        assert_eq!(err.failed, 3);
    }

    /// Shortener that blocks for a while on selected URLs and records peak concurrency.
    struct SlowShortener {
        delays: HashMap<String, Duration>,
        in_flight: AtomicUsize,
        peak: AtomicUsize,
        seen: Mutex<Vec<String>>,
    }

    impl SlowShortener {
        fn new(delays: &[(&str, u64)]) -> Self {
            Self {
                delays: delays
                    .iter()
                    .map(|(u, ms)| (u.to_string(), Duration::from_millis(*ms)))
                    .collect(),
                in_flight: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LinkShortener for SlowShortener {
        async fn shorten(&self, url: &str) -> Result<ShortenedLink, ShortenProviderError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            self.seen.lock().unwrap().push(url.to_string());

            if let Some(delay) = self.delays.get(url) {
                tokio::time::sleep(*delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(link(url, &format!("http://s/{}", url.trim_start_matches("http://"))))
        }
    }

    #[tokio::test]
    async fn test_calls_run_concurrently_and_keep_order() {
        let shortener = Arc::new(SlowShortener::new(&[("http://a.com", 50), ("http://b.com", 10)]));
        let service = RewriteService::new(shortener.clone(), RewriteLimits::default());

        let message = "http://a.com http://b.com http://c.com";
        let outcome = service.rewrite(message, &pattern(message)).await.unwrap();

        assert_eq!(outcome.message, "http://s/a.com http://s/b.com http://s/c.com");
        assert_eq!(shortener.peak.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_concurrency_is_bounded() {
        let shortener = Arc::new(SlowShortener::new(&[
            ("http://a.com", 20),
            ("http://b.com", 20),
            ("http://c.com", 20),
            ("http://d.com", 20),
        ]));
        let limits = RewriteLimits {
            call_timeout: Duration::from_secs(5),
            max_concurrency: 2,
        };
        let service = RewriteService::new(shortener.clone(), limits);

        let message = "http://a.com http://b.com http://c.com http://d.com";
        service.rewrite(message, &pattern(message)).await.unwrap();

        assert_eq!(shortener.peak.load(Ordering::SeqCst), 2);
        assert_eq!(shortener.seen.lock().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_slow_call_times_out() {
        let shortener = Arc::new(SlowShortener::new(&[("http://slow.com", 2_000)]));
        let limits = RewriteLimits {
            call_timeout: Duration::from_millis(50),
            max_concurrency: 4,
        };
        let service = RewriteService::new(shortener, limits);

        let message = "fast http://fast.com slow http://slow.com";
        let err = service
            .rewrite(message, &pattern(message))
            .await
            .unwrap_err();

        assert_eq!(err.url, "http://slow.com");
        assert!(matches!(err.source, ShortenProviderError::Timeout(_)));
    }

    #[tokio::test]
    async fn test_markup_rewrite_replaces_href_only() {
        let mut mock = MockLinkShortener::new();
        mock.expect_shorten()
            .times(1)
            .returning(|url| Ok(link(url, "https://bit.ly/x")));

        let message = "<a href='http://x.com'>x</a>";
        let occurrences = LinkExtractor::new(ExtractionMode::Markup).extract(message);
        let outcome = service(mock).rewrite(message, &occurrences).await.unwrap();

        assert_eq!(outcome.message, "<a href='https://bit.ly/x'>x</a>");
    }

    #[tokio::test]
    async fn test_markup_encoded_href_is_rewritten() {
        let mut mock = MockLinkShortener::new();
        mock.expect_shorten()
            .withf(|url| url == "http://x.com/?a=1&b=2")
            .times(1)
            .returning(|url| Ok(link(url, "https://bit.ly/x")));

        let message = r#"<a href="http://x.com/?a=1&amp;b=2">x</a>"#;
        let occurrences = LinkExtractor::new(ExtractionMode::Markup).extract(message);
        let outcome = service(mock).rewrite(message, &occurrences).await.unwrap();

        assert!(outcome.is_rewritten());
        assert_eq!(outcome.message, r#"<a href="https://bit.ly/x">x</a>"#);
    }

    #[tokio::test]
    async fn test_rewrite_runs_on_spawned_task() {
        let mut mock = MockLinkShortener::new();
        mock.expect_shorten()
            .times(2)
            .returning(|url| Ok(link(url, "http://short/1")));
        let service = Arc::new(service(mock));

        let handle = tokio::spawn(async move {
            let message = "a http://x.com b http://y.com".to_string();
            let occurrences = pattern(&message);
            service.rewrite(&message, &occurrences).await
        });

        let outcome = handle.await.unwrap().unwrap();
        assert_eq!(outcome.message, "a http://short/1 b http://short/1");
    }

    #[test]
    fn test_substitute_escapes_encoded_spans() {
        use crate::domain::entities::OccurrenceSource;

        let message = r#"<a href="http://x.com/?a=1&amp;b=2">x</a>"#;
        let occurrences = vec![
            LinkOccurrence::new(0, "http://x.com/?a=1&b=2", Some(9..34), OccurrenceSource::Markup)
                .encoded(),
        ];
        let links = vec![link("", "http://s/?k=1&v=2")];

        assert_eq!(
            substitute(message, &occurrences, &links),
            r#"<a href="http://s/?k=1&amp;v=2">x</a>"#
        );
    }

    #[test]
    fn test_substitute_skips_unlocated_and_overlapping() {
        use crate::domain::entities::OccurrenceSource;

        let message = "abc http://x.com def";
        let occurrences = vec![
            LinkOccurrence::new(0, "http://x.com", Some(4..16), OccurrenceSource::Pattern),
            LinkOccurrence::new(1, "http://x.com", Some(6..10), OccurrenceSource::Pattern),
            LinkOccurrence::new(2, "http://y.com", None, OccurrenceSource::Markup),
        ];
        let links = vec![link("", "S1"), link("", "S2"), link("", "S3")];

        assert_eq!(substitute(message, &occurrences, &links), "abc S1 def");
    }
}
