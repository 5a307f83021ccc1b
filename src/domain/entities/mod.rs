//! Core domain entities for the link rewriting pipeline.
//!
//! All entities are created per request and dropped once the response is
//! produced; nothing here is persisted.
//!
//! # Entity Types
//!
//! - [`LinkOccurrence`] - A link found inside a message
//! - [`ShortenedLink`] - A long URL and the short URL issued for it
//! - [`RewriteOutcome`] - The rewritten message and its status

pub mod occurrence;
pub mod rewrite;
pub mod shortened_link;

pub use occurrence::{LinkOccurrence, OccurrenceSource, escape_attribute};
pub use rewrite::{RewriteOutcome, RewriteStatus};
pub use shortened_link::ShortenedLink;
