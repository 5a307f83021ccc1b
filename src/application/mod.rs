//! Application layer services implementing the rewrite pipeline.
//!
//! Services consume the collaborator traits from [`crate::domain::providers`]
//! and give HTTP handlers and the CLI a single entry point.
//!
//! # Available Services
//!
//! - [`services::link_extractor::LinkExtractor`] - Finds link occurrences in a message
//! - [`services::rewrite_service::RewriteService`] - Shortens and substitutes all occurrences

pub mod services;
