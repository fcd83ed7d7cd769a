//! Outbound channel abstraction.
//!
//! ```text
//! SeaTalk ──POST /event-callback──▶ gateway ──OutboundMessage──▶ ChannelPlugin::send
//! cron ──CronJob──▶ JobRunner ──OutboundMessage──▶ ChannelPlugin::send
//! ```
//!
//! The gateway owns inbound HTTP; a channel only knows how to deliver
//! messages to the platform.

use dutybot_types::{ChannelStatus, OutboundMessage};

/// A platform the bot can post messages to.
///
/// Use `&self` for all methods; implementations should use interior
/// mutability for credentials or other mutable state.
#[async_trait::async_trait]
pub trait ChannelPlugin: Send + Sync {
    /// Returns the channel type identifier (e.g. "seatalk").
    fn channel_type(&self) -> &str;

    /// Returns the unique instance identifier for this channel.
    fn channel_id(&self) -> &str;

    /// Prepare the channel, e.g. verify credentials with the platform.
    async fn start(&self) -> anyhow::Result<()>;

    /// Deliver a message to the platform.
    async fn send(&self, message: OutboundMessage) -> anyhow::Result<()>;

    /// Returns the current status of this channel.
    fn status(&self) -> ChannelStatus;
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};

    /// A channel that records what it sends, optionally failing every send.
    pub(crate) struct MockChannel {
        pub sent: tokio::sync::Mutex<Vec<OutboundMessage>>,
        fail: AtomicBool,
    }

    impl MockChannel {
        pub(crate) fn new() -> Self {
            Self {
                sent: tokio::sync::Mutex::new(Vec::new()),
                fail: AtomicBool::new(false),
            }
        }

        pub(crate) fn failing() -> Self {
            let ch = Self::new();
            ch.fail.store(true, Ordering::SeqCst);
            ch
        }
    }

    #[async_trait::async_trait]
    impl ChannelPlugin for MockChannel {
        fn channel_type(&self) -> &str {
            "mock"
        }

        fn channel_id(&self) -> &str {
            "mock-1"
        }

        async fn start(&self) -> anyhow::Result<()> {
            Ok(())
        }

        async fn send(&self, message: OutboundMessage) -> anyhow::Result<()> {
            if self.fail.load(Ordering::SeqCst) {
                anyhow::bail!("API returned an error");
            }
            self.sent.lock().await.push(message);
            Ok(())
        }

        fn status(&self) -> ChannelStatus {
            if self.fail.load(Ordering::SeqCst) {
                ChannelStatus::Error("failing".into())
            } else {
                ChannelStatus::Ready
            }
        }
    }

    #[tokio::test]
    async fn test_mock_records_messages() {
        let ch = MockChannel::new();
        ch.send(OutboundMessage::to_group("g", "hi")).await.unwrap();
        assert_eq!(ch.sent.lock().await.len(), 1);
        assert_eq!(ch.status(), ChannelStatus::Ready);

        let failing = MockChannel::failing();
        assert!(failing.send(OutboundMessage::to_group("g", "hi")).await.is_err());
    }
}
