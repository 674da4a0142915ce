//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod cache;
mod email;
mod rate_limit;
mod repository;

pub use auth::{AuthError, PasswordService, TokenClaims, TokenService};
pub use cache::{Cache, CacheError};
pub use email::{EmailError, EmailMessage, EmailSender};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::{
    BaseRepository, CommentRepository, ForumRepository, PostRepository, TagRepository,
    UserRepository,
};
