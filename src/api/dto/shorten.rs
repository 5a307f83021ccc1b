//! DTOs for the message shortening webhook.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

/// Event name reported for a rewritten message.
pub const EVENT_NAME: &str = "link_shortened";
/// Username the rewritten message is posted as.
pub const BOT_USERNAME: &str = "link-snap-bot";

/// Inbound webhook payload.
///
/// `settings` and `channel_id` are opaque: `settings` only has to be present,
/// `channel_id` selects the relay target when given. Any non-null `settings`
/// value counts as present, including `false`, `0` and `""`; only a missing
/// field or an explicit `null` is rejected.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[validate(required, length(min = 1))]
    pub message: Option<String>,

    #[validate(required)]
    #[serde(default, deserialize_with = "non_null")]
    pub settings: Option<Value>,

    pub channel_id: Option<String>,
}

/// Treats an explicit JSON `null` the same as a missing field.
fn non_null<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.filter(|v| !v.is_null()))
}

/// Response sent when the message contained no links.
#[derive(Debug, Serialize)]
pub struct UnchangedResponse {
    pub message: String,
}

/// Response sent for a rewritten message.
#[derive(Debug, Serialize)]
pub struct ShortenedResponse {
    pub event_name: &'static str,
    pub message: String,
    pub status: &'static str,
    pub username: &'static str,
}

impl ShortenedResponse {
    pub fn success(message: String) -> Self {
        Self {
            event_name: EVENT_NAME,
            message,
            status: "success",
            username: BOT_USERNAME,
        }
    }
}

/// Either response shape; serialized without a discriminator.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ShortenResponse {
    Unchanged(UnchangedResponse),
    Shortened(ShortenedResponse),
}
