//! Application services - the use cases behind each route.

mod accounts;
mod comments;
mod posts;
mod tags;
pub mod thread;

pub use accounts::{AccountService, AccountSettings, Registration, Session, UserPurge};
pub use comments::{CommentRemoval, CommentService};
pub use posts::{BlogPostView, NO_TAG, PostDraft, PostService};
pub use tags::TagService;
pub use thread::{CommentArena, CommentEntry, CommentThread, UNKNOWN_AUTHOR};
