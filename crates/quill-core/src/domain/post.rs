use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a published blog article.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: i32,
    pub user_id: Uuid,
    pub tag_id: Option<i32>,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
    pub view_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Fields for a post that has not been stored yet.
#[derive(Debug, Clone)]
pub struct NewPost {
    pub user_id: Uuid,
    pub tag_id: Option<i32>,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub thumbnail_url: Option<String>,
}

impl Post {
    /// Turn a title into a URL slug: lowercase ASCII alphanumerics joined by `-`.
    pub fn slugify(title: &str) -> String {
        let mut slug = String::with_capacity(title.len());
        for c in title.chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.is_empty() && !slug.ends_with('-') {
                slug.push('-');
            }
        }
        while slug.ends_with('-') {
            slug.pop();
        }
        if slug.is_empty() {
            slug.push_str("post");
        }
        slug
    }
}
