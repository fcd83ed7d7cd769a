//! SeaTalk Open API request/response types (minimal subset).

use serde::{Deserialize, Serialize};

/// Message tag for text messages.
pub const TAG_TEXT: &str = "text";
/// Text rendered as Markdown.
pub const FORMAT_MARKDOWN: u8 = 1;

/// Body of the app access token request.
#[derive(Debug, Serialize)]
pub struct TokenRequest<'a> {
    pub app_id: &'a str,
    pub app_secret: &'a str,
}

/// App access token response. `expire` is a unix timestamp in seconds.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub code: i64,
    #[serde(default)]
    pub app_access_token: String,
    #[serde(default)]
    pub expire: i64,
}

/// Text payload of a message.
#[derive(Debug, Clone, Serialize)]
pub struct TextContent {
    pub format: u8,
    pub content: String,
}

/// A message body.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub tag: String,
    pub text: TextContent,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

impl Message {
    pub fn text(content: impl Into<String>, format: u8) -> Self {
        Self {
            tag: TAG_TEXT.to_string(),
            text: TextContent {
                format,
                content: content.into(),
            },
            thread_id: None,
        }
    }
}

/// Parameters for sending to a group chat.
#[derive(Debug, Serialize)]
pub struct SendGroupMessage {
    pub group_id: String,
    pub message: Message,
}

/// Parameters for sending to a bot subscriber.
#[derive(Debug, Serialize)]
pub struct SendSubscriberMessage {
    pub employee_code: String,
    pub message: Message,
}

/// Response of both send endpoints.
#[derive(Debug, Deserialize)]
pub struct SendMessageResponse {
    pub code: i64,
    #[serde(default)]
    pub message_id: Option<String>,
}

/// Error body returned with non-2xx statuses.
#[derive(Debug, Deserialize)]
pub struct ApiErrorBody {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}
