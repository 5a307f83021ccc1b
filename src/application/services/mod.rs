//! Business logic services for the application layer.

pub mod link_extractor;
pub mod rewrite_service;

pub use link_extractor::{ExtractionMode, LinkExtractor};
pub use rewrite_service::{RewriteLimits, RewriteService};
