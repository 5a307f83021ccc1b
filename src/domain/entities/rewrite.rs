//! Outcome of a batch rewrite.

use super::ShortenedLink;

/// Summary status of a successful rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RewriteStatus {
    /// No links were found; the message is returned as received.
    Unchanged,
    /// Every occurrence was shortened and substituted.
    Rewritten,
}

/// Successful result of [`crate::application::services::RewriteService::rewrite`].
#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    pub message: String,
    pub status: RewriteStatus,
    /// One entry per occurrence, in scan order.
    pub links: Vec<ShortenedLink>,
}

impl RewriteOutcome {
    /// Outcome for a message without links.
    pub fn unchanged(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: RewriteStatus::Unchanged,
            links: Vec::new(),
        }
    }

    /// Outcome for a fully rewritten message.
    pub fn rewritten(message: String, links: Vec<ShortenedLink>) -> Self {
        Self {
            message,
            status: RewriteStatus::Rewritten,
            links,
        }
    }

    pub fn is_rewritten(&self) -> bool {
        self.status == RewriteStatus::Rewritten
    }
}
