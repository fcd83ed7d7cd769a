//! SeaTalk channel for dutybot.
//!
//! Sends text to group chats and bot subscribers through the SeaTalk Open
//! API. Inbound events arrive through the gateway's callback endpoint.
//!
//! # Configuration
//!
//! ```json5
//! seatalk: {
//!     app_id: "...",
//!     app_secret: "...",
//!     // optional, enables callback signature checks
//!     signing_secret: "...",
//! }
//! ```

pub mod api;
pub mod error;
pub mod token;
pub mod types;

use std::sync::{Arc, PoisonError, RwLock};

use anyhow::{Context, bail};
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use dutybot_config::SeaTalkConfig;
use dutybot_types::{ChannelStatus, OutboundMessage, Recipient};

use api::SeaTalkApi;
use token::{AccessToken, refresh_if_needed};
use types::{FORMAT_MARKDOWN, Message, SendGroupMessage, SendSubscriberMessage};

pub use error::SeaTalkError;

/// SeaTalk channel plugin implementing `ChannelPlugin`.
pub struct SeaTalkChannel {
    id: String,
    api: SeaTalkApi,
    /// Held for the whole of a send.
    token: Mutex<Option<AccessToken>>,
    status: RwLock<ChannelStatus>,
}

impl SeaTalkChannel {
    /// Create a new SeaTalk channel with the given ID and API client.
    pub fn new(id: String, api: SeaTalkApi) -> Self {
        Self {
            id,
            api,
            token: Mutex::new(None),
            status: RwLock::new(ChannelStatus::Idle),
        }
    }

    fn set_status(&self, status: ChannelStatus) {
        *self.status.write().unwrap_or_else(PoisonError::into_inner) = status;
    }

    /// Hand out a token valid for the next send, refreshing it when close to expiry.
    async fn fresh_token(&self, slot: &mut Option<AccessToken>) -> anyhow::Result<AccessToken> {
        match refresh_if_needed(&self.api, slot.take(), Utc::now()).await {
            Ok(token) => {
                *slot = Some(token.clone());
                self.set_status(ChannelStatus::Ready);
                Ok(token)
            }
            Err(e) => {
                self.set_status(ChannelStatus::Error(format!("Auth failed: {e}")));
                Err(e).context("failed to get token")
            }
        }
    }
}

#[async_trait::async_trait]
impl dutybot_gateway::channel::ChannelPlugin for SeaTalkChannel {
    fn channel_type(&self) -> &str {
        "seatalk"
    }

    fn channel_id(&self) -> &str {
        &self.id
    }

    async fn start(&self) -> anyhow::Result<()> {
        let mut slot = self.token.lock().await;
        let token = self.fresh_token(&mut slot).await?;
        info!(
            channel_id = self.id,
            expires_at = %token.expires_at,
            "SeaTalk app authenticated"
        );
        Ok(())
    }

    async fn send(&self, message: OutboundMessage) -> anyhow::Result<()> {
        let mut slot = self.token.lock().await;
        let token = self.fresh_token(&mut slot).await?;

        let mut body = Message::text(message.text, FORMAT_MARKDOWN);
        body.thread_id = message.thread_id;

        let result = match message.recipient {
            Recipient::Group(group_id) => {
                debug!(channel_id = self.id, group_id, "Sending group message");
                self.api
                    .send_to_group(
                        &token,
                        &SendGroupMessage {
                            group_id,
                            message: body,
                        },
                    )
                    .await
            }
            Recipient::Subscriber(employee_code) => {
                debug!(channel_id = self.id, employee_code, "Sending subscriber message");
                self.api
                    .send_to_subscriber(
                        &token,
                        &SendSubscriberMessage {
                            employee_code,
                            message: body,
                        },
                    )
                    .await
            }
        };

        if let Err(e) = result {
            self.set_status(ChannelStatus::Error(e.to_string()));
            return Err(e.into());
        }
        Ok(())
    }

    fn status(&self) -> ChannelStatus {
        self.status
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// Factory function: create a `SeaTalkChannel` from the SeaTalk config.
pub fn create_seatalk_channel(
    id: String,
    config: &SeaTalkConfig,
) -> anyhow::Result<Arc<dyn dutybot_gateway::channel::ChannelPlugin>> {
    if config.app_id.is_empty() || config.app_secret.is_empty() {
        bail!("SeaTalk channel requires seatalk.app_id and seatalk.app_secret");
    }
    let api = SeaTalkApi::new(config).context("failed to build SeaTalk client")?;
    Ok(Arc::new(SeaTalkChannel::new(id, api)))
}
