mod http_relay;
mod inmemory;

pub use http_relay::HttpRelaySender;
pub use inmemory::{InMemorySender, SentMessage};

use std::sync::Arc;
use tracing::info;

/// Capability for delivering a rendered message to an address, pluggable
/// per channel
#[async_trait::async_trait]
pub trait INotificationSender: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}

/// One sender per contact channel
#[derive(Clone)]
pub struct NotificationSenders {
    pub email: Arc<dyn INotificationSender>,
    pub sms: Arc<dyn INotificationSender>,
}

/// Sender that only logs, used when no delivery relay is configured
pub struct NoopSender {
    channel: &'static str,
}

impl NoopSender {
    pub fn new(channel: &'static str) -> Self {
        Self { channel }
    }
}

#[async_trait::async_trait]
impl INotificationSender for NoopSender {
    async fn send(&self, to: &str, subject: &str, _body: &str) -> anyhow::Result<()> {
        info!(
            "No {} relay configured, dropping message to {} with subject: {}",
            self.channel, to, subject
        );
        Ok(())
    }
}
