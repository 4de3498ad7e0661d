//! Outbound mail transport
//!
//! The notification worker renders a message per recipient and hands it to a
//! [`Mailer`]. `LogMailer` only writes the message to the log (development);
//! `WebhookMailer` POSTs it as JSON to a relay such as a transactional mail
//! provider's HTTP API.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

use crate::core::config::{MailerKind, NotificationConfig};

/// A single rendered mail addressed to one recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("Mail transport is not configured: {0}")]
    NotConfigured(String),

    #[error("Failed to deliver mail: {0}")]
    Delivery(String),

    #[error("Mail relay rejected message with status {0}")]
    Rejected(u16),
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError>;
}

/// Writes messages to the log instead of sending them
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            "Mail (log transport):\n{}",
            message.body
        );
        Ok(())
    }
}

/// POSTs `{from, to, subject, body}` to a mail relay endpoint
pub struct WebhookMailer {
    url: String,
    client: Client,
}

impl WebhookMailer {
    pub fn new(url: String) -> Result<Self, MailError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| MailError::NotConfigured(e.to_string()))?;

        Ok(Self { url, client })
    }
}

#[async_trait]
impl Mailer for WebhookMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let response = self
            .client
            .post(&self.url)
            .json(message)
            .send()
            .await
            .map_err(|e| MailError::Delivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(to = %message.to, %status, "Mail relay rejected message");
            return Err(MailError::Rejected(status.as_u16()));
        }

        tracing::debug!(to = %message.to, "Mail delivered to relay");
        Ok(())
    }
}

/// Build the transport selected by `MAILER`
pub fn build_mailer(config: &NotificationConfig) -> Result<Arc<dyn Mailer>, MailError> {
    match config.mailer {
        MailerKind::Log => Ok(Arc::new(LogMailer)),
        MailerKind::Webhook => {
            let url = config.webhook_url.clone().ok_or_else(|| {
                MailError::NotConfigured("MAIL_WEBHOOK_URL is not set".to_string())
            })?;
            Ok(Arc::new(WebhookMailer::new(url)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_log_mailer_always_succeeds() {
        let message = MailMessage {
            from: "no-reply@ideaboard.test".to_string(),
            to: "voter@example.com".to_string(),
            subject: "Subject".to_string(),
            body: "Body".to_string(),
        };
        assert!(LogMailer.send(&message).await.is_ok());
    }

    #[test]
    fn test_mail_message_serializes_flat() {
        let message = MailMessage {
            from: "a@example.com".to_string(),
            to: "b@example.com".to_string(),
            subject: "s".to_string(),
            body: "b".to_string(),
        };
        let value = serde_json::to_value(&message).unwrap();
        assert_eq!(value["to"], "b@example.com");
        assert_eq!(value["subject"], "s");
    }
}
