//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business logic failures.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The message is shown to the visitor as-is.
    #[error("{0}")]
    NotFound(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("{0}")]
    Duplicate(String),

    #[error("Unauthorized access")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl DomainError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// Text suitable for a toast shown to the visitor.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(msg) | Self::Validation(msg) | Self::Duplicate(msg) => msg.clone(),
            Self::Unauthorized => "Please sign in first".to_string(),
            Self::Forbidden => "You are not allowed to do that".to_string(),
            Self::Internal(_) | Self::Repo(_) => "Something went wrong".to_string(),
        }
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Entity not found")]
    NotFound,

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
