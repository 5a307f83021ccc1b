//! Domain layer: entities and collaborator contracts.
//!
//! # Architecture
//!
//! - [`entities`] - Per-request data structures
//! - [`providers`] - Traits for the shortening provider and the channel relay
//!
//! # Rewrite Flow
//!
//! 1. Handler receives a chat message
//! 2. [`crate::application::services::LinkExtractor`] yields [`entities::LinkOccurrence`]s
//! 3. [`crate::application::services::RewriteService`] shortens every occurrence
//!    through a [`providers::LinkShortener`] and substitutes the results
//! 4. The rewritten message is optionally handed to a [`providers::Notifier`]

pub mod entities;
pub mod providers;
