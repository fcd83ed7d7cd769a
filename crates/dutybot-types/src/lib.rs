use serde::{Deserialize, Serialize};

// ──────────────────── Callback Types ────────────────────

/// Event type sent once when the callback URL is registered.
pub const EVENT_VERIFICATION: &str = "event_verification";
/// A 1:1 message from a user subscribed to the bot.
pub const EVENT_SUBSCRIBER_MESSAGE: &str = "message_from_bot_subscriber";
/// A group message that mentions the bot.
pub const EVENT_GROUP_MENTION: &str = "new_mentioned_message_from_group_chat";

/// Envelope of an inbound SeaTalk event callback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventCallbackRequest {
    #[serde(default)]
    pub event_id: String,
    pub event_type: String,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub event: CallbackEvent,
}

/// Event payload. Which fields are populated depends on `event_type`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallbackEvent {
    #[serde(default)]
    pub seatalk_challenge: String,
    #[serde(default)]
    pub employee_code: String,
    #[serde(default)]
    pub group_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<CallbackMessage>,
}

/// A chat message carried by a callback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallbackMessage {
    #[serde(default)]
    pub message_id: String,
    #[serde(default)]
    pub thread_id: String,
    #[serde(default)]
    pub sender: CallbackSender,
    #[serde(default)]
    pub tag: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<CallbackText>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallbackSender {
    #[serde(default)]
    pub seatalk_id: String,
    #[serde(default)]
    pub employee_code: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CallbackText {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub plain_text: String,
}

/// Body returned to SeaTalk after a callback is handled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventCallbackResponse {
    pub seatalk_challenge: String,
}

// ──────────────────── Outbound Types ────────────────────

/// Where an outbound message is delivered.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Recipient {
    /// A group chat the bot has joined.
    Group(String),
    /// A single subscriber, addressed by employee code.
    Subscriber(String),
}

/// Message from the bot to the platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub recipient: Recipient,
    /// Text content. May contain `<mention-tag .../>` references.
    pub text: String,
    /// Reply inside a thread, when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

impl OutboundMessage {
    pub fn to_group(group_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            recipient: Recipient::Group(group_id.into()),
            text: text.into(),
            thread_id: None,
        }
    }

    pub fn to_subscriber(employee_code: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            recipient: Recipient::Subscriber(employee_code.into()),
            text: text.into(),
            thread_id: None,
        }
    }

    /// Post into `thread_id`; an empty id leaves the message unthreaded.
    pub fn in_thread(mut self, thread_id: impl Into<String>) -> Self {
        let thread_id = thread_id.into();
        self.thread_id = (!thread_id.is_empty()).then_some(thread_id);
        self
    }
}

/// Status of a channel plugin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChannelStatus {
    /// No credential fetched yet.
    Idle,
    /// Holding a valid credential.
    Ready,
    /// Last platform call failed.
    Error(String),
}
