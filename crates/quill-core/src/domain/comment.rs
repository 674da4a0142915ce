use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity. A comment without a parent is top-level, otherwise it is a reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i32,
    pub post_id: i32,
    pub user_id: Uuid,
    pub description: String,
    pub parent_comment_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Comment {
    pub fn is_top_level(&self) -> bool {
        self.parent_comment_id.is_none()
    }
}

/// A comment about to be inserted.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub post_id: i32,
    pub user_id: Uuid,
    pub description: String,
    pub parent_comment_id: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl NewComment {
    /// A top-level comment stamped with the current time.
    pub fn top_level(post_id: i32, user_id: Uuid, description: String) -> Self {
        Self {
            post_id,
            user_id,
            description,
            parent_comment_id: None,
            created_at: Utc::now(),
        }
    }

    /// A reply to `parent_id` stamped with the current time.
    pub fn reply(parent_id: i32, post_id: i32, user_id: Uuid, description: String) -> Self {
        Self {
            parent_comment_id: Some(parent_id),
            ..Self::top_level(post_id, user_id, description)
        }
    }
}
