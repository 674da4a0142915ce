//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - In-memory store only
//! - `postgres` - PostgreSQL storage via SeaORM
//! - `auth` - JWT sessions + Argon2 password hashing
//! - `rate-limit` - Per-client rate limiting via governor
//! - `smtp` - Password reset mail over SMTP via lettre

pub mod cache;
pub mod database;
pub mod email;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

pub use cache::InMemoryCache;
pub use database::InMemoryBlogStore;
pub use email::{LogEmailSender, RecordingEmailSender};

#[cfg(feature = "auth")]
pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};

#[cfg(feature = "smtp")]
pub use email::{SmtpConfig, SmtpEmailSender};
