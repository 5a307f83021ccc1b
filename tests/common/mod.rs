#![allow(dead_code)]

use link_snap::application::services::{
    ExtractionMode, LinkExtractor, RewriteLimits, RewriteService,
};
use link_snap::domain::providers::{LinkShortener, Notifier};
use link_snap::infrastructure::notifier::{NullNotifier, TelexNotifier};
use link_snap::infrastructure::shortener::BitlyShortener;
use link_snap::state::AppState;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_TOKEN: &str = "test-bitly-token";
pub const SHORTEN_PATH: &str = "/v4/shorten";

pub fn integration_file() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("integration.json")
}

pub fn shortener_for(server: &MockServer) -> Arc<dyn LinkShortener> {
    Arc::new(
        BitlyShortener::new(
            format!("{}{}", server.uri(), SHORTEN_PATH),
            TEST_TOKEN,
            Duration::from_secs(5),
        )
        .unwrap(),
    )
}

/// State whose provider and relay both point at `server`.
pub fn create_test_state(server: &MockServer, mode: ExtractionMode) -> AppState {
    let notifier: Arc<dyn Notifier> =
        Arc::new(TelexNotifier::new(server.uri(), Duration::from_secs(5)).unwrap());
    build_state(server, mode, notifier, RewriteLimits::default())
}

/// State with relay disabled.
pub fn create_state_without_relay(server: &MockServer, mode: ExtractionMode) -> AppState {
    build_state(
        server,
        mode,
        Arc::new(NullNotifier::new()),
        RewriteLimits::default(),
    )
}

pub fn build_state(
    server: &MockServer,
    mode: ExtractionMode,
    notifier: Arc<dyn Notifier>,
    limits: RewriteLimits,
) -> AppState {
    AppState::new(
        LinkExtractor::new(mode),
        Arc::new(RewriteService::new(shortener_for(server), limits)),
        notifier,
        Duration::from_secs(5),
        integration_file(),
    )
}

/// Mounts a Bitly response for one long URL, expecting exactly `times` calls.
pub async fn mock_shorten(server: &MockServer, long_url: &str, short_url: &str, times: u64) {
    Mock::given(method("POST"))
        .and(path(SHORTEN_PATH))
        .and(body_json(json!({ "long_url": long_url })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "created_at": "2024-11-02T12:00:00+0000",
            "id": short_url.trim_start_matches("https://"),
            "link": short_url,
            "long_url": long_url
        })))
        .expect(times)
        .mount(server)
        .await;
}

/// Mounts a Bitly failure for one long URL.
pub async fn mock_shorten_failure(server: &MockServer, long_url: &str, status: u16) {
    Mock::given(method("POST"))
        .and(path(SHORTEN_PATH))
        .and(body_json(json!({ "long_url": long_url })))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "message": "INTERNAL_ERROR",
            "description": "Something went wrong"
        })))
        .expect(1)
        .mount(server)
        .await;
}

/// Asserts that the provider is never called.
pub async fn expect_no_shorten_calls(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(SHORTEN_PATH))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(server)
        .await;
}

/// Waits for the background relay to issue `count` channel updates.
pub async fn wait_for_relay(server: &MockServer, count: usize) {
    for _ in 0..200 {
        let relayed = server
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter(|r| r.method.as_str() == "PUT")
            .count();
        if relayed >= count {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("expected {} relayed message(s)", count);
}
