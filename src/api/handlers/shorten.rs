//! Handler for the message shortening webhook.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::shorten::{
    ShortenRequest, ShortenResponse, ShortenedResponse, UnchangedResponse,
};
use crate::domain::providers::Notifier;
use crate::error::AppError;
use crate::state::AppState;

/// Rewrites every link in a chat message to a short link.
///
/// # Endpoint
///
/// `POST /shortenURL` (alias `POST /shortenUrl`)
///
/// # Request Body
///
/// ```json
/// {
///   "message": "read https://example.com/a/very/long/path",
///   "settings": [],
///   "channel_id": "01JB..."          // optional
/// }
/// ```
///
/// # Response
///
/// No links found:
///
/// ```json
/// { "message": "original text" }
/// ```
///
/// Links rewritten:
///
/// ```json
/// {
///   "event_name": "link_shortened",
///   "message": "read https://bit.ly/3xYz",
///   "status": "success",
///   "username": "link-snap-bot"
/// }
/// ```
///
/// When `channel_id` is present, the rewritten message is also relayed to
/// that channel on a background task. The response does not wait for the
/// relay; a relay failure or timeout is only logged.
///
/// # Errors
///
/// - 400 if the body is not JSON or `message` / `settings` are missing
/// - 500 `{ "error": "Failed to process the message" }` if any link could not
///   be shortened; no partially rewritten message is returned
pub async fn shorten_handler(
    State(state): State<AppState>,
    payload: Result<Json<ShortenRequest>, JsonRejection>,
) -> Result<Json<ShortenResponse>, AppError> {
    let Json(payload) = payload.map_err(|rejection| {
        AppError::bad_request(
            "Message and settings are required",
            json!({ "reason": rejection.body_text() }),
        )
    })?;
    payload.validate()?;

    let ShortenRequest {
        message,
        channel_id,
        ..
    } = payload;
    let message = message.unwrap_or_default();

    tracing::info!(
        input = %message,
        channel_id = channel_id.as_deref().unwrap_or("-"),
        "Incoming request"
    );

    let occurrences = state.extractor.extract(&message);
    if occurrences.is_empty() {
        return Ok(Json(ShortenResponse::Unchanged(UnchangedResponse { message })));
    }

    let outcome = state
        .rewrite_service
        .rewrite(&message, &occurrences)
        .await
        .map_err(|e| {
            tracing::error!(
                input = %e.original_message,
                url = %e.url,
                error = %e,
                "Error processing request"
            );
            AppError::from(e)
        })?;

    tracing::info!(output = %outcome.message, "Formatted message");

    if let Some(channel_id) = channel_id {
        tokio::spawn(relay(
            Arc::clone(&state.notifier),
            state.relay_timeout,
            channel_id,
            outcome.message.clone(),
        ));
    }

    Ok(Json(ShortenResponse::Shortened(ShortenedResponse::success(
        outcome.message,
    ))))
}

/// Pushes the rewritten message to its channel; failures are only logged.
async fn relay(
    notifier: Arc<dyn Notifier>,
    relay_timeout: Duration,
    channel_id: String,
    content: String,
) {
    let name = notifier.name();
    let channel_id = channel_id.as_str();

    match tokio::time::timeout(relay_timeout, notifier.relay(channel_id, &content)).await {
        Ok(Ok(())) => tracing::debug!(notifier = name, channel_id, "Message relayed"),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, notifier = name, channel_id, "Failed to relay rewritten message");
        }
        Err(_) => {
            tracing::warn!(notifier = name, channel_id, "Relay timed out");
        }
    }
}
