use anyhow::{Result, anyhow};
use tracing::{error, info};

use crate::config::Settings;

/// Notifier trait so the monitor loop can be driven with a fake in tests
#[async_trait::async_trait]
pub trait Notify: Send + Sync {
    /// Deliver one alert, best-effort. Delivery failure is logged and
    /// swallowed; it must never crash or block the monitor loop.
    async fn notify(&self, text: &str);
}

/// Sends operator alerts through the Telegram Bot API
pub struct TelegramNotifier {
    client: reqwest::Client,
    send_url: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(client: reqwest::Client, settings: &Settings) -> Self {
        Self {
            client,
            send_url: format!(
                "https://api.telegram.org/bot{}/sendMessage",
                settings.telegram_token
            ),
            chat_id: settings.telegram_chat_id.clone(),
        }
    }

    async fn send(&self, text: &str) -> Result<()> {
        let payload = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
        });

        let response = self.client.post(&self.send_url).json(&payload).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("telegram api returned status code: {status}"));
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl Notify for TelegramNotifier {
    async fn notify(&self, text: &str) {
        match self.send(text).await {
            Ok(()) => info!("telegram message sent: {text}"),
            Err(e) => error!(error = %e, "failed to send telegram message"),
        }
    }
}
