//! Domain entities - the core business objects.

mod comment;
mod forum;
mod post;
mod tag;
mod user;

pub use comment::{Comment, NewComment};
pub use forum::{Answer, ForumPost};
pub use post::{NewPost, Post};
pub use tag::Tag;
pub use user::{Role, User};
