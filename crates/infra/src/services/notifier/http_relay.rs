use super::INotificationSender;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RelayMessage<'a> {
    channel: &'a str,
    to: &'a str,
    subject: &'a str,
    body: &'a str,
}

/// Delivers messages by posting them to an external relay endpoint that
/// owns the actual channel protocol (SMTP, SMS gateway, ...)
pub struct HttpRelaySender {
    client: reqwest::Client,
    channel: &'static str,
    url: String,
    key: String,
}

impl HttpRelaySender {
    pub fn new(channel: &'static str, url: String, key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            channel,
            url,
            key,
        }
    }
}

#[async_trait::async_trait]
impl INotificationSender for HttpRelaySender {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        let res = self
            .client
            .post(&self.url)
            .header("remind-relay-key", &self.key)
            .json(&RelayMessage {
                channel: self.channel,
                to,
                subject,
                body,
            })
            .send()
            .await?;
        res.error_for_status()?;
        Ok(())
    }
}
