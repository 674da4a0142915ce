//! Email senders that never leave the process.

use async_trait::async_trait;
use tokio::sync::Mutex;

use quill_core::ports::{EmailError, EmailMessage, EmailSender};

/// Logs messages instead of sending them. Used when no SMTP relay is configured.
#[derive(Debug, Default)]
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        tracing::info!(
            recipients = message.to.len(),
            subject = %message.subject,
            "SMTP not configured; email logged instead of sent"
        );
        tracing::debug!(body = %message.body, "Unsent email body");
        Ok(())
    }
}

/// Keeps every message for later inspection.
#[derive(Debug, Default)]
pub struct RecordingEmailSender {
    sent: Mutex<Vec<EmailMessage>>,
}

impl RecordingEmailSender {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn sent(&self) -> Vec<EmailMessage> {
        self.sent.lock().await.clone()
    }
}

#[async_trait]
impl EmailSender for RecordingEmailSender {
    async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        self.sent.lock().await.push(message);
        Ok(())
    }
}
