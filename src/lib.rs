//! # Link Snap
//!
//! A chat webhook that finds every link in a message, shortens each one through
//! Bitly, and returns (and optionally relays) the rewritten message.
//!
//! ## Architecture
//!
//! - **Domain Layer** ([`domain`]) - Per-request entities and collaborator traits
//! - **Application Layer** ([`application`]) - Link extraction and batch rewriting
//! - **Infrastructure Layer** ([`infrastructure`]) - Bitly client and channel relay
//! - **API Layer** ([`api`]) - Webhook handlers, DTOs, and middleware
//!
//! ## Pipeline
//!
//! 1. [`application::services::LinkExtractor`] finds occurrences, either bare
//!    URLs or anchor `href`s depending on [`application::services::ExtractionMode`]
//! 2. [`application::services::RewriteService`] shortens them concurrently with
//!    a per-call timeout and a bound on in-flight calls
//! 3. If every call succeeds the occurrences are substituted in place;
//!    otherwise the whole batch fails and the caller gets a generic error
//!
//! ## Quick Start
//!
//! ```bash
//! export BITLY_ACCESS_TOKEN="..."
//! cargo run
//! ```
//!
//! ## Configuration
//!
//! Service configuration is loaded from environment variables via [`config::Config`].
//! See [`config`] module for available options.

pub mod api;
pub mod application;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod state;

pub mod config;
pub mod logging;
pub mod server;

pub mod routes;

pub use error::AppError;
pub use state::AppState;

/// Commonly used types for external consumers.
///
/// Re-exports frequently used types to simplify imports for library users
/// and integration tests.
pub mod prelude {
    pub use crate::application::services::{
        ExtractionMode, LinkExtractor, RewriteLimits, RewriteService,
    };
    pub use crate::domain::entities::{
        LinkOccurrence, OccurrenceSource, RewriteOutcome, RewriteStatus, ShortenedLink,
    };
    pub use crate::domain::providers::{LinkShortener, Notifier};
    pub use crate::error::{AppError, RelayError, RewriteError, ShortenProviderError};
    pub use crate::state::AppState;
}
