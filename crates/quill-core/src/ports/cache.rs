//! Short-lived key/value storage, used for single-use password reset tokens.

use async_trait::async_trait;
use std::time::Duration;

/// Cache trait - abstraction over expiring key/value backends.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Get a live value.
    async fn get(&self, key: &str) -> Option<String>;

    /// Store a value, optionally expiring after `ttl`.
    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> Result<(), CacheError>;

    /// Remove and return a live value in one step.
    async fn take(&self, key: &str) -> Option<String>;
}

/// Cache operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache unavailable: {0}")]
    Unavailable(String),
}
