//! HTTP server initialization and runtime setup.
//!
//! Wires the shortening provider, the relay and the extractor into
//! [`AppState`] and runs the Axum server until shutdown.

use crate::application::services::{LinkExtractor, RewriteService};
use crate::config::Config;
use crate::domain::providers::{LinkShortener, Notifier};
use crate::infrastructure::notifier::{NullNotifier, TelexNotifier};
use crate::infrastructure::shortener::BitlyShortener;
use crate::routes::app_router;
use crate::state::AppState;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use std::net::SocketAddr;
use std::sync::Arc;

/// Builds the application state from configuration.
///
/// # Errors
///
/// Returns an error if an HTTP client cannot be constructed.
pub fn build_state(config: &Config) -> Result<AppState> {
    let shortener: Arc<dyn LinkShortener> = Arc::new(
        BitlyShortener::new(
            &config.bitly_api_url,
            &config.bitly_access_token,
            config.shorten_timeout(),
        )
        .context("Failed to build Bitly client")?,
    );

    let notifier: Arc<dyn Notifier> = if config.relay_enabled {
        tracing::info!("Relay enabled ({})", config.telex_api_url);
        Arc::new(
            TelexNotifier::new(&config.telex_api_url, config.shorten_timeout())
                .context("Failed to build relay client")?,
        )
    } else {
        tracing::info!("Relay disabled (NullNotifier)");
        Arc::new(NullNotifier::new())
    };

    let rewrite_service = Arc::new(RewriteService::new(shortener, config.rewrite_limits()));

    Ok(AppState::new(
        LinkExtractor::new(config.extraction_mode),
        rewrite_service,
        notifier,
        config.shorten_timeout(),
        config.integration_file.clone(),
    ))
}

/// Runs the HTTP server with the given configuration.
///
/// Serves until Ctrl+C (or SIGTERM on Unix) is received.
///
/// # Errors
///
/// Returns an error if:
/// - An HTTP client cannot be built
/// - Server bind fails
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let state = build_state(&config)?;

    if !config.integration_file.exists() {
        tracing::warn!(
            "Integration file {} not found; GET /integration will return 404",
            config.integration_file.display()
        );
    }

    let app = app_router(state);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!("Failed to listen for SIGTERM: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
