//! Data Transfer Objects - form payloads and view models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Blog forms
// ---------------------------------------------------------------------------

/// Top-level comment on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentForm {
    pub post_id: i32,
    pub description: String,
}

/// Reply to an existing comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyForm {
    pub parent_comment_id: i32,
    pub post_id: i32,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteCommentForm {
    pub comment_id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePostForm {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub tag_id: Option<i32>,
}

// ---------------------------------------------------------------------------
// Admin forms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagForm {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteTagForm {
    pub id: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteUserForm {
    pub user_id: Uuid,
}

// ---------------------------------------------------------------------------
// Account forms
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterForm {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Sign-in accepts either the username or the email in one field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginForm {
    pub username_or_email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForgotPasswordForm {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetPasswordForm {
    pub email: String,
    pub token: String,
    pub password: String,
}

/// Query string of the mailed reset link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResetLinkQuery {
    pub token: String,
}

// ---------------------------------------------------------------------------
// View models
// ---------------------------------------------------------------------------

/// One post in a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummary {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub thumbnail_url: Option<String>,
    pub view_count: i32,
    pub created_date: DateTime<Utc>,
}

/// A single comment as rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentResponse {
    pub id: i32,
    pub description: String,
    pub author_name: String,
    pub parent_comment_id: Option<i32>,
    pub created_date: DateTime<Utc>,
}

/// A top-level comment with everything posted beneath it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentThreadResponse {
    #[serde(flatten)]
    pub comment: CommentResponse,
    pub replies: Vec<CommentResponse>,
}

/// The post page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPostResponse {
    pub id: i32,
    pub slug: String,
    pub title: String,
    pub view_count: i32,
    pub tag_name: String,
    pub author_name: String,
    pub created_date: DateTime<Utc>,
    pub thumbnail_url: Option<String>,
    pub description: String,
    pub comments: Vec<CommentThreadResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
}

/// A user as listed in the admin area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub role: String,
}

/// Plain message pages such as the reset confirmations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagePage {
    pub title: String,
    pub message: String,
}

impl MessagePage {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}
