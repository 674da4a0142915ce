//! Domain values to view models.

use quill_core::domain::{Post, Tag, User};
use quill_core::services::{BlogPostView, CommentEntry, CommentThread};
use quill_shared::dto::{
    BlogPostResponse, CommentResponse, CommentThreadResponse, PostSummary, TagResponse,
    UserResponse,
};

pub fn post_summary(post: Post) -> PostSummary {
    PostSummary {
        id: post.id,
        slug: post.slug,
        title: post.title,
        thumbnail_url: post.thumbnail_url,
        view_count: post.view_count,
        created_date: post.created_at,
    }
}

fn comment(entry: CommentEntry) -> CommentResponse {
    CommentResponse {
        id: entry.comment.id,
        description: entry.comment.description,
        author_name: entry.author_name,
        parent_comment_id: entry.comment.parent_comment_id,
        created_date: entry.comment.created_at,
    }
}

fn thread(thread: CommentThread) -> CommentThreadResponse {
    CommentThreadResponse {
        comment: comment(CommentEntry {
            comment: thread.comment,
            author_name: thread.author_name,
        }),
        replies: thread.replies.into_iter().map(comment).collect(),
    }
}

pub fn blog_post(view: BlogPostView) -> BlogPostResponse {
    BlogPostResponse {
        id: view.id,
        slug: view.slug,
        title: view.title,
        view_count: view.view_count,
        tag_name: view.tag_name,
        author_name: view.author_name,
        created_date: view.created_date,
        thumbnail_url: view.thumbnail_url,
        description: view.description,
        comments: view.comments.into_iter().map(thread).collect(),
    }
}

pub fn tag(tag: Tag) -> TagResponse {
    TagResponse {
        id: tag.id,
        name: tag.name,
    }
}

pub fn user(user: User) -> UserResponse {
    UserResponse {
        id: user.id,
        role: user.role.to_string(),
        first_name: user.first_name,
        last_name: user.last_name,
        username: user.username,
        email: user.email,
    }
}
