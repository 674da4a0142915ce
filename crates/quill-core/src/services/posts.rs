//! Post reading and authoring.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{NewPost, Post};
use crate::error::DomainError;
use crate::ports::{PostRepository, TagRepository, UserRepository};

use super::comments::CommentService;
use super::thread::{CommentThread, UNKNOWN_AUTHOR};

/// Shown for posts without a tag.
pub const NO_TAG: &str = "None Tag";

/// Everything the post page renders.
#[derive(Debug, Clone)]
pub struct BlogPostView {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub view_count: i32,
    pub tag_name: String,
    pub author_name: String,
    pub created_date: DateTime<Utc>,
    pub thumbnail_url: Option<String>,
    pub description: String,
    pub comments: Vec<CommentThread>,
}

/// Input for a new post.
#[derive(Debug, Clone)]
pub struct PostDraft {
    pub title: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub tag_id: Option<i32>,
}

#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
    tags: Arc<dyn TagRepository>,
    users: Arc<dyn UserRepository>,
    comments: CommentService,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        tags: Arc<dyn TagRepository>,
        users: Arc<dyn UserRepository>,
        comments: CommentService,
    ) -> Self {
        Self {
            posts,
            tags,
            users,
            comments,
        }
    }

    /// Load a post for reading. Every successful read counts as one view.
    pub async fn view_post(&self, slug: &str) -> Result<BlogPostView, DomainError> {
        let post = self
            .posts
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("Post not found!"))?;

        let view_count = self.posts.increment_view_count(post.id).await?;

        let tag_name = match post.tag_id {
            Some(tag_id) => self
                .tags
                .find_by_id(tag_id)
                .await?
                .map(|t| t.name)
                .unwrap_or_else(|| NO_TAG.to_string()),
            None => NO_TAG.to_string(),
        };

        let author_name = self
            .users
            .find_by_id(post.user_id)
            .await?
            .map(|u| u.display_name())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

        let comments = self.comments.build_tree(post.id).await?;

        tracing::debug!(post_id = post.id, view_count, "Post viewed");

        Ok(BlogPostView {
            id: post.id,
            slug: post.slug,
            title: post.title,
            view_count,
            tag_name,
            author_name,
            created_date: post.created_at,
            thumbnail_url: post.thumbnail_url,
            description: post.description,
            comments,
        })
    }

    /// Newest posts for the home page.
    pub async fn recent(&self, limit: u64) -> Result<Vec<Post>, DomainError> {
        Ok(self.posts.list_recent(limit).await?)
    }

    /// Publish a post under a slug derived from its title.
    pub async fn create_post(&self, author: Uuid, draft: PostDraft) -> Result<Post, DomainError> {
        let title = draft.title.trim();
        if title.is_empty() {
            return Err(DomainError::Validation("Title is required".to_string()));
        }

        if let Some(tag_id) = draft.tag_id {
            if self.tags.find_by_id(tag_id).await?.is_none() {
                return Err(DomainError::not_found("Tag not found!"));
            }
        }

        let slug = self.unique_slug(title).await?;
        let post = self
            .posts
            .create(NewPost {
                user_id: author,
                tag_id: draft.tag_id,
                title: title.to_string(),
                slug,
                description: draft.description,
                thumbnail_url: draft.thumbnail_url,
            })
            .await?;

        tracing::info!(post_id = post.id, slug = %post.slug, user_id = %author, "Post created");
        Ok(post)
    }

    async fn unique_slug(&self, title: &str) -> Result<String, DomainError> {
        let base = Post::slugify(title);
        let mut candidate = base.clone();
        let mut suffix = 2;
        while self.posts.slug_exists(&candidate).await? {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }
        Ok(candidate)
    }
}
