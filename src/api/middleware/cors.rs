//! Cross-origin policy.

use tower_http::cors::CorsLayer;

/// Allows any origin, method and header.
///
/// The webhook is called by the chat platform and the integration descriptor
/// is fetched from its web UI, neither of which sends credentials.
pub fn layer() -> CorsLayer {
    CorsLayer::permissive()
}
