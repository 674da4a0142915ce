//! Email delivery: SMTP relay, log-only fallback and a recording double.

mod memory;

#[cfg(feature = "smtp")]
mod smtp;

pub use memory::{LogEmailSender, RecordingEmailSender};

#[cfg(feature = "smtp")]
pub use smtp::{SmtpConfig, SmtpEmailSender};
