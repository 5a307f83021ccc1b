//! Channel relay implementations.
//!
//! - [`TelexNotifier`] - Telex channel message update
//! - [`NullNotifier`] - Relay disabled

pub mod null_notifier;
pub mod telex;

pub use null_notifier::NullNotifier;
pub use telex::{DEFAULT_TELEX_URL, TelexNotifier};
