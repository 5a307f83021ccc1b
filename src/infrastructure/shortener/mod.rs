//! Shortening provider implementations.

pub mod bitly;

pub use bitly::{BitlyShortener, DEFAULT_BITLY_URL};
