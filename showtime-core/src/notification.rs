use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::info;

use crate::CoreResult;

/// Fire-and-forget delivery of customer messages.
///
/// Callers log failures; a failed notification never undoes the operation
/// that triggered it.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_notification(&self, recipient: &str, message: &str) -> CoreResult<()>;
}

#[derive(Debug, Default, Clone)]
pub struct EmailNotifier;

#[async_trait]
impl Notifier for EmailNotifier {
    async fn send_notification(&self, recipient: &str, message: &str) -> CoreResult<()> {
        info!(recipient, "Sending email: {}", message);
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct SmsNotifier;

#[async_trait]
impl Notifier for SmsNotifier {
    async fn send_notification(&self, recipient: &str, message: &str) -> CoreResult<()> {
        info!(recipient, "Sending SMS: {}", message);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipient: String,
    pub message: String,
}

/// Keeps every message in memory instead of delivering it
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<Notification> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_notification(&self, recipient: &str, message: &str) -> CoreResult<()> {
        self.sent.lock().await.push(Notification {
            recipient: recipient.to_string(),
            message: message.to_string(),
        });
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    #[default]
    Email,
    Sms,
}

impl NotificationChannel {
    pub fn build(self) -> Arc<dyn Notifier> {
        match self {
            NotificationChannel::Email => Arc::new(EmailNotifier),
            NotificationChannel::Sms => Arc::new(SmsNotifier),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_recording_notifier() {
        let notifier = RecordingNotifier::new();
        notifier.send_notification("guest", "hello").await.unwrap();

        let sent = notifier.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].recipient, "guest");
        assert_eq!(sent[0].message, "hello");
    }

    #[tokio::test]
    async fn test_channel_from_config() {
        let channel: NotificationChannel = serde_json::from_str("\"sms\"").unwrap();
        assert_eq!(channel, NotificationChannel::Sms);
        assert!(channel.build().send_notification("+15550100", "hi").await.is_ok());
    }
}
