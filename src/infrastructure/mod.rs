//! Infrastructure layer: outbound HTTP integrations.
//!
//! Implements the traits defined in [`crate::domain::providers`].

pub mod notifier;
pub mod shortener;
