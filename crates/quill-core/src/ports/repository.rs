use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, NewComment, NewPost, Post, Tag, User};
use crate::error::RepoError;

/// Lookup and removal by primary key, shared by every repository.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its primary key.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Delete an entity by its primary key. `RepoError::NotFound` if nothing was removed.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// User accounts.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    /// Fetch every user whose id is in `ids`, in no particular order.
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;

    async fn list(&self) -> Result<Vec<User>, RepoError>;

    /// Insert or update a user.
    async fn save(&self, user: User) -> Result<User, RepoError>;
}

/// Blog posts.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, i32> {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Newest posts first.
    async fn list_recent(&self, limit: u64) -> Result<Vec<Post>, RepoError>;

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError>;

    async fn create(&self, post: NewPost) -> Result<Post, RepoError>;

    /// Bump the view counter and return the new value.
    async fn increment_view_count(&self, id: i32) -> Result<i32, RepoError>;

    /// Remove every post owned by `user_id` together with the comments on those posts.
    /// Returns the number of posts removed.
    async fn delete_by_owner(&self, user_id: Uuid) -> Result<u64, RepoError>;
}

/// Flat comment records; threading is rebuilt by the service layer.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, i32> {
    /// All comments on a post, oldest first (ties broken by id).
    async fn find_by_post(&self, post_id: i32) -> Result<Vec<Comment>, RepoError>;

    async fn create(&self, comment: NewComment) -> Result<Comment, RepoError>;

    /// Remove every comment whose parent is `parent_id`.
    async fn delete_by_parent(&self, parent_id: i32) -> Result<u64, RepoError>;

    /// Remove every comment written by `user_id`, on any post. Replies from
    /// other authors beneath them become top-level comments. Returns the
    /// number of comments removed.
    async fn delete_by_author(&self, user_id: Uuid) -> Result<u64, RepoError>;
}

/// Tags.
#[async_trait]
pub trait TagRepository: BaseRepository<Tag, i32> {
    /// All tags ordered by id.
    async fn list(&self) -> Result<Vec<Tag>, RepoError>;

    async fn exists_by_name(&self, name: &str) -> Result<bool, RepoError>;

    async fn create(&self, name: &str) -> Result<Tag, RepoError>;
}

/// Forum content. Only the removal needed by account deletion is exposed.
#[async_trait]
pub trait ForumRepository: Send + Sync {
    /// Remove every forum post owned by `user_id` together with its answers.
    /// Returns the number of forum posts removed.
    async fn delete_by_owner(&self, user_id: Uuid) -> Result<u64, RepoError>;
}
