//! Transactional email port.

use async_trait::async_trait;

/// A plain-text message to a list of recipients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailMessage {
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl EmailMessage {
    pub fn new(to: Vec<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            to,
            subject: subject.into(),
            body: body.into(),
        }
    }
}

/// Email sender trait - abstraction over SMTP relays and test doubles.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: EmailMessage) -> Result<(), EmailError>;
}

/// Email delivery errors.
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Failed to build message: {0}")]
    Build(String),

    #[error("Transport error: {0}")]
    Transport(String),
}
