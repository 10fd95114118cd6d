use super::INotificationSender;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Sender that records what it was asked to deliver, used in tests
pub struct InMemorySender {
    sent: Mutex<Vec<SentMessage>>,
    fail: AtomicBool,
}

impl InMemorySender {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(vec![]),
            fail: AtomicBool::new(false),
        }
    }

    pub fn sent(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }

    /// Makes every following send fail until disabled again
    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }
}

impl Default for InMemorySender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl INotificationSender for InMemorySender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("Sender was told to fail"));
        }
        self.sent.lock().unwrap().push(SentMessage {
            to: to.into(),
            subject: subject.into(),
            body: body.into(),
        });
        Ok(())
    }
}
