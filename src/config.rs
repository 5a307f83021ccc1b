//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ## Required Variables
//!
//! - `BITLY_ACCESS_TOKEN` - Bearer token for the Bitly API
//!
//! ## Optional Variables
//!
//! - `PORT` - Listen port (default: `4000`)
//! - `LISTEN` - Full bind address, overrides `PORT` (e.g. `127.0.0.1:8080`)
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `LOG_FILE` - Also append logs to this file (default: unset, stdout only)
//! - `EXTRACTION_MODE` - `pattern` (bare URLs) or `markup` (anchor `href`s), default `pattern`
//! - `SHORTEN_TIMEOUT_SECS` - Per-call shortening timeout (default: 10)
//! - `MAX_CONCURRENT_SHORTEN` - Shortening calls in flight per message (default: 16)
//! - `BITLY_API_URL` - Shorten endpoint (default: Bitly v4)
//! - `TELEX_API_URL` - Channel API base URL (default: `https://api.telex.im`)
//! - `RELAY_ENABLED` - Push rewritten messages back to the channel (default: `true`)
//! - `INTEGRATION_FILE` - Descriptor served on `GET /integration` (default: `integration.json`)

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::application::services::{ExtractionMode, RewriteLimits};
use crate::infrastructure::notifier::DEFAULT_TELEX_URL;
use crate::infrastructure::shortener::DEFAULT_BITLY_URL;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub log_level: String,
    pub log_format: String,
    pub log_file: Option<PathBuf>,
    /// Bitly bearer credential. Never logged in clear.
    pub bitly_access_token: String,
    pub bitly_api_url: String,
    pub telex_api_url: String,
    pub extraction_mode: ExtractionMode,
    /// Timeout for a single shortening or relay call, in seconds.
    pub shorten_timeout_secs: u64,
    pub max_concurrent_shorten: usize,
    pub relay_enabled: bool,
    pub integration_file: PathBuf,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if `BITLY_ACCESS_TOKEN` is missing or `EXTRACTION_MODE`
    /// is not recognised.
    pub fn from_env() -> Result<Self> {
        let listen_addr = Self::load_listen_addr();
        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
        let log_file = env::var("LOG_FILE")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        let bitly_access_token =
            env::var("BITLY_ACCESS_TOKEN").context("BITLY_ACCESS_TOKEN must be set")?;
        let bitly_api_url =
            env::var("BITLY_API_URL").unwrap_or_else(|_| DEFAULT_BITLY_URL.to_string());
        let telex_api_url =
            env::var("TELEX_API_URL").unwrap_or_else(|_| DEFAULT_TELEX_URL.to_string());

        let extraction_mode = match env::var("EXTRACTION_MODE") {
            Ok(value) => value
                .parse()
                .map_err(anyhow::Error::msg)
                .context("Invalid EXTRACTION_MODE")?,
            Err(_) => ExtractionMode::default(),
        };

        let shorten_timeout_secs = env::var("SHORTEN_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(10);

        let max_concurrent_shorten = env::var("MAX_CONCURRENT_SHORTEN")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(16);

        let relay_enabled = env::var("RELAY_ENABLED")
            .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
            .unwrap_or(true);

        let integration_file = env::var("INTEGRATION_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("integration.json"));

        Ok(Self {
            listen_addr,
            log_level,
            log_format,
            log_file,
            bitly_access_token,
            bitly_api_url,
            telex_api_url,
            extraction_mode,
            shorten_timeout_secs,
            max_concurrent_shorten,
            relay_enabled,
            integration_file,
        })
    }

    /// Resolves the bind address.
    ///
    /// Priority:
    /// 1. `LISTEN` environment variable
    /// 2. `0.0.0.0:{PORT}`, with `PORT` defaulting to 4000
    fn load_listen_addr() -> String {
        if let Ok(listen) = env::var("LISTEN") {
            return listen;
        }

        let port = env::var("PORT").unwrap_or_else(|_| "4000".to_string());
        format!("0.0.0.0:{}", port)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the access token is empty
    /// - `log_format` is not `text` or `json`
    /// - `listen_addr` is invalid
    /// - the timeout is zero or the concurrency bound is outside 1..=256
    /// - an API URL is not HTTP(S)
    pub fn validate(&self) -> Result<()> {
        if self.bitly_access_token.trim().is_empty() {
            anyhow::bail!("BITLY_ACCESS_TOKEN must not be empty");
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if self.shorten_timeout_secs == 0 {
            anyhow::bail!("SHORTEN_TIMEOUT_SECS must be greater than 0");
        }

        if self.max_concurrent_shorten == 0 || self.max_concurrent_shorten > 256 {
            anyhow::bail!(
                "MAX_CONCURRENT_SHORTEN must be between 1 and 256, got {}",
                self.max_concurrent_shorten
            );
        }

        for (name, value) in [
            ("BITLY_API_URL", &self.bitly_api_url),
            ("TELEX_API_URL", &self.telex_api_url),
        ] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                anyhow::bail!(
                    "{} must start with 'http://' or 'https://', got '{}'",
                    name,
                    value
                );
            }
        }

        Ok(())
    }

    pub fn shorten_timeout(&self) -> Duration {
        Duration::from_secs(self.shorten_timeout_secs)
    }

    /// Fan-out limits for the rewrite service.
    pub fn rewrite_limits(&self) -> RewriteLimits {
        RewriteLimits {
            call_timeout: self.shorten_timeout(),
            max_concurrency: self.max_concurrent_shorten,
        }
    }

    /// Prints configuration summary (without sensitive data).
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Bitly endpoint: {}", self.bitly_api_url);
        tracing::info!("  Bitly token: {}", mask_secret(&self.bitly_access_token));
        tracing::info!("  Extraction mode: {}", self.extraction_mode);
        tracing::info!(
            "  Shortening: timeout {}s, max {} concurrent",
            self.shorten_timeout_secs,
            self.max_concurrent_shorten
        );

        if self.relay_enabled {
            tracing::info!("  Relay: {} (enabled)", self.telex_api_url);
        } else {
            tracing::info!("  Relay: disabled");
        }

        tracing::info!("  Integration file: {}", self.integration_file.display());
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        if let Some(path) = &self.log_file {
            tracing::info!("  Log file: {}", path.display());
        }
    }
}

/// Masks a secret for logging, keeping at most the last four characters.
///
/// - `abcdef123456` → `********3456`
/// - `abc` → `***`
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }

    let visible: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}", "*".repeat(chars.len() - 4), visible)
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if required variables are missing or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
