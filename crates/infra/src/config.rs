use remind_utils::create_random_secret;
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Config {
    /// Port for the application to run on
    pub port: usize,
    /// HTTP endpoint of the email delivery relay. When not set the email
    /// channel falls back to a noop sender that only logs.
    pub email_relay_url: Option<String>,
    /// HTTP endpoint of the SMS delivery relay. When not set the sms
    /// channel falls back to a noop sender that only logs.
    pub sms_relay_url: Option<String>,
    /// Key sent to the relays so they can verify the request origin
    pub relay_key: String,
}

impl Config {
    pub fn new() -> Self {
        let default_port = "5000";
        let port = std::env::var("PORT").unwrap_or(default_port.into());
        let port = match port.parse::<usize>() {
            Ok(port) => port,
            Err(_) => {
                warn!(
                    "The given PORT: {} is not valid, falling back to the default port: {}.",
                    port, default_port
                );
                default_port.parse::<usize>().unwrap()
            }
        };
        let relay_key = match std::env::var("NOTIFICATION_RELAY_KEY") {
            Ok(key) => key,
            Err(_) => {
                info!("Did not find NOTIFICATION_RELAY_KEY environment variable. Going to create one.");
                create_random_secret(16)
            }
        };
        Self {
            port,
            email_relay_url: std::env::var("EMAIL_RELAY_URL").ok(),
            sms_relay_url: std::env::var("SMS_RELAY_URL").ok(),
            relay_key,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
