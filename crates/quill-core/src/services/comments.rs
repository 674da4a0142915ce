//! Comment threads: building, submission and removal.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{Comment, NewComment, Post};
use crate::error::DomainError;
use crate::ports::{CommentRepository, PostRepository, UserRepository};

use super::thread::{CommentArena, CommentThread};

/// What a comment removal touched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRemoval {
    /// Post the removed comment belonged to.
    pub post_id: i32,
    /// Replies removed alongside the comment.
    pub replies_removed: u64,
}

/// Comment service - threads, submissions and deletions for blog posts.
#[derive(Clone)]
pub struct CommentService {
    comments: Arc<dyn CommentRepository>,
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
}

impl CommentService {
    pub fn new(
        comments: Arc<dyn CommentRepository>,
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
    ) -> Self {
        Self {
            comments,
            posts,
            users,
        }
    }

    /// Top-level comments of a post, each with its replies. Read-only; a missing
    /// post simply has no comments.
    pub async fn build_tree(&self, post_id: i32) -> Result<Vec<CommentThread>, DomainError> {
        let comments = self.comments.find_by_post(post_id).await?;
        if comments.is_empty() {
            return Ok(Vec::new());
        }

        let mut author_ids: Vec<Uuid> = comments.iter().map(|c| c.user_id).collect();
        author_ids.sort_unstable();
        author_ids.dedup();

        let author_names: HashMap<Uuid, String> = self
            .users
            .find_many(&author_ids)
            .await?
            .into_iter()
            .map(|u| (u.id, u.display_name()))
            .collect();

        Ok(CommentArena::new(comments).into_threads(&author_names))
    }

    /// Attach a top-level comment to a post. Nothing is written when the post is missing.
    pub async fn add_comment(
        &self,
        post_id: i32,
        user_id: Uuid,
        description: String,
    ) -> Result<(Post, Comment), DomainError> {
        let post = self.require_post(post_id).await?;

        let comment = self
            .comments
            .create(NewComment::top_level(post.id, user_id, description))
            .await?;

        tracing::info!(post_id, comment_id = comment.id, %user_id, "Comment added");
        Ok((post, comment))
    }

    /// Reply to an existing comment. The parent must exist and sit on the same post.
    pub async fn add_reply(
        &self,
        parent_id: i32,
        post_id: i32,
        user_id: Uuid,
        description: String,
    ) -> Result<(Post, Comment), DomainError> {
        let post = self.require_post(post_id).await?;

        let parent = self
            .comments
            .find_by_id(parent_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Parent comment not found!"))?;

        if parent.post_id != post.id {
            return Err(DomainError::Validation(
                "Reply must target a comment on the same post".to_string(),
            ));
        }

        let reply = self
            .comments
            .create(NewComment::reply(parent.id, post.id, user_id, description))
            .await?;

        tracing::info!(post_id, parent_id, comment_id = reply.id, %user_id, "Reply added");
        Ok((post, reply))
    }

    /// Delete a comment and every reply below it.
    ///
    /// Replies go first, each level through an explicit delete-by-parent, then
    /// the comment itself by exact id. The passes are not atomic.
    pub async fn delete_comment(&self, comment_id: i32) -> Result<CommentRemoval, DomainError> {
        let target = self
            .comments
            .find_by_id(comment_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Comment not found!"))?;

        let arena = CommentArena::new(self.comments.find_by_post(target.post_id).await?);

        // Deepest parents first so every pass removes leaves only.
        let mut parents: Vec<i32> = arena
            .descendants_of(target.id)
            .into_iter()
            .filter(|id| !arena.children_of(*id).is_empty())
            .collect();
        parents.reverse();
        parents.push(target.id);

        let mut replies_removed = 0;
        for parent in parents {
            replies_removed += self.comments.delete_by_parent(parent).await?;
        }

        self.comments.delete(target.id).await?;

        tracing::info!(
            comment_id,
            post_id = target.post_id,
            replies_removed,
            "Comment deleted"
        );

        Ok(CommentRemoval {
            post_id: target.post_id,
            replies_removed,
        })
    }

    async fn require_post(&self, post_id: i32) -> Result<Post, DomainError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post not found!"))
    }
}
