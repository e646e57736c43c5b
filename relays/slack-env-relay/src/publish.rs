//! Posts the finished message to a Slack incoming webhook.

use crate::slack::SlackMessage;
use reqwest::{Client, StatusCode};

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("webhook request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("webhook rejected message with status {0}")]
    Status(StatusCode),
}

/// Single-attempt webhook poster.
#[derive(Debug, Clone, Default)]
pub struct WebhookPublisher {
    http: Client,
}

impl WebhookPublisher {
    pub fn new(http: Client) -> Self {
        Self { http }
    }

    pub async fn publish(&self, webhook_url: &str, message: &SlackMessage) -> Result<(), PublishError> {
        let response = self.http.post(webhook_url).json(message).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PublishError::Status(status));
        }

        tracing::info!(channel = %message.channel, blocks = message.blocks.len(), "posted message to Slack");
        Ok(())
    }
}
