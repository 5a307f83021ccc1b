//! Collaborator traits for the outbound side of the service.
//!
//! Concrete implementations live in `crate::infrastructure`; mocks are
//! generated via `mockall` for unit tests.

pub mod notifier;
pub mod shortener;

pub use notifier::Notifier;
pub use shortener::LinkShortener;

#[cfg(test)]
pub use notifier::MockNotifier;
#[cfg(test)]
pub use shortener::MockLinkShortener;
