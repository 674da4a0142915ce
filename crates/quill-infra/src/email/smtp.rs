//! SMTP delivery through lettre's async transport.

use async_trait::async_trait;
use lettre::message::{Mailbox, Message, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};

use quill_core::ports::{EmailError, EmailMessage, EmailSender};

/// SMTP relay settings.
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub from: String,
}

impl SmtpConfig {
    /// Read `SMTP_*` variables. `None` when `SMTP_HOST` is unset or blank.
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("SMTP_HOST").ok().filter(|h| !h.trim().is_empty())?;
        Some(Self {
            host,
            port: std::env::var("SMTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(587),
            username: std::env::var("SMTP_USERNAME").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
            from: std::env::var("SMTP_FROM").unwrap_or_else(|_| "Quill <no-reply@localhost>".to_string()),
        })
    }
}

/// Sends plain-text mail over STARTTLS.
pub struct SmtpEmailSender {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpEmailSender {
    pub fn new(config: &SmtpConfig) -> Result<Self, EmailError> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| EmailError::InvalidAddress(format!("SMTP_FROM: {e}")))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| EmailError::Transport(e.to_string()))?
            .port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        tracing::info!(host = %config.host, port = config.port, "SMTP transport configured");
        Ok(Self {
            transport: builder.build(),
            from,
        })
    }
}

#[async_trait]
impl EmailSender for SmtpEmailSender {
    async fn send(&self, message: EmailMessage) -> Result<(), EmailError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .subject(message.subject.as_str())
            .header(header::ContentType::TEXT_PLAIN);

        for recipient in &message.to {
            let mailbox = recipient
                .parse::<Mailbox>()
                .map_err(|e| EmailError::InvalidAddress(e.to_string()))?;
            builder = builder.to(mailbox);
        }

        let email = builder
            .body(message.body)
            .map_err(|e| EmailError::Build(e.to_string()))?;

        self.transport
            .send(email)
            .await
            .map_err(|e| EmailError::Transport(e.to_string()))?;

        tracing::info!(subject = %message.subject, "Email sent");
        Ok(())
    }
}
