use std::{error::Error, fmt, time::Duration};

use anyhow::Result;
use async_trait::async_trait;

use crate::config::{TELEGRAM_API_BASE, TelegramConfig};

/// Abstract outbound channel for one cycle's findings.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Deliver one formatted text block. Failure is reported, never retried
    /// within the same cycle.
    async fn deliver(&self, text: &str) -> Result<()>;
}

#[derive(Debug)]
pub enum SinkError {
    Http(String),
    Rejected(u16),
}

impl fmt::Display for SinkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SinkError::Http(msg) => write!(f, "Telegram request failed: {}", msg),
            SinkError::Rejected(status) => {
                write!(f, "Telegram rejected the message with status {}", status)
            }
        }
    }
}

impl Error for SinkError {}

pub struct TelegramSink {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramSink {
    pub fn new(config: TelegramConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;
        Ok(Self { config, client })
    }

    fn send_message_url(&self) -> String {
        format!(
            "{}/bot{}/sendMessage",
            TELEGRAM_API_BASE, self.config.bot_token
        )
    }
}

#[async_trait]
impl NotificationSink for TelegramSink {
    async fn deliver(&self, text: &str) -> Result<()> {
        let payload = serde_json::json!({
            "chat_id": self.config.chat_id,
            "text": text,
            "parse_mode": "HTML",
        });

        let response = self
            .client
            .post(self.send_message_url())
            .json(&payload)
            .send()
            .await
            .map_err(|e| SinkError::Http(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SinkError::Rejected(status.as_u16()).into());
        }

        log::info!("✅ Notification delivered");
        Ok(())
    }
}

/// Prints instead of sending. Backs `--dry-run` and the analyze bin.
pub struct StdoutSink;

#[async_trait]
impl NotificationSink for StdoutSink {
    async fn deliver(&self, text: &str) -> Result<()> {
        println!("{}", text);
        Ok(())
    }
}
