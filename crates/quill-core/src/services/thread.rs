//! Two-level comment threads rebuilt from flat records.
//!
//! Comments are stored flat with an optional parent id. [`CommentArena`] keys the
//! records by id and indexes parent id -> child ids so a post's discussion can be
//! rendered as top-level comments, each followed by its replies.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::domain::Comment;

/// Shown when a comment's author no longer resolves.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// A comment together with its author's display name.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentEntry {
    pub comment: Comment,
    pub author_name: String,
}

/// A top-level comment and the replies rendered beneath it.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentThread {
    pub comment: Comment,
    pub author_name: String,
    pub replies: Vec<CommentEntry>,
}

/// Flat comments of one post, keyed by id, with a parent -> children index.
pub struct CommentArena {
    records: HashMap<i32, Comment>,
    /// Ids in display order: creation time, then id.
    order: Vec<i32>,
    children: HashMap<i32, Vec<i32>>,
}

impl CommentArena {
    pub fn new(mut comments: Vec<Comment>) -> Self {
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));

        let mut order = Vec::with_capacity(comments.len());
        let mut children: HashMap<i32, Vec<i32>> = HashMap::new();
        let mut records = HashMap::with_capacity(comments.len());

        for comment in comments {
            order.push(comment.id);
            if let Some(parent) = comment.parent_comment_id {
                children.entry(parent).or_default().push(comment.id);
            }
            records.insert(comment.id, comment);
        }

        Self {
            records,
            order,
            children,
        }
    }

    pub fn get(&self, id: i32) -> Option<&Comment> {
        self.records.get(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Comments without a parent, in display order.
    pub fn top_level(&self) -> impl Iterator<Item = &Comment> {
        self.order
            .iter()
            .filter_map(|id| self.records.get(id))
            .filter(|c| c.is_top_level())
    }

    /// Direct replies of `id`, in display order.
    pub fn children_of(&self, id: i32) -> &[i32] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Every comment below `id`, parents before their children.
    /// Self-referencing chains are visited once.
    pub fn descendants_of(&self, id: i32) -> Vec<i32> {
        let mut seen = HashSet::from([id]);
        let mut out = Vec::new();
        let mut stack: Vec<i32> = self.children_of(id).iter().rev().copied().collect();

        while let Some(next) = stack.pop() {
            if !seen.insert(next) {
                continue;
            }
            out.push(next);
            stack.extend(self.children_of(next).iter().rev());
        }

        out
    }

    /// Build the render tree. Replies at any depth are listed under their
    /// top-level ancestor in display order; orphans whose chain never reaches
    /// a top-level comment are not shown.
    pub fn into_threads(self, author_names: &HashMap<Uuid, String>) -> Vec<CommentThread> {
        let position: HashMap<i32, usize> = self
            .order
            .iter()
            .enumerate()
            .map(|(idx, id)| (*id, idx))
            .collect();

        let entry = |comment: &Comment| CommentEntry {
            comment: comment.clone(),
            author_name: author_name(author_names, comment.user_id),
        };

        self.top_level()
            .map(|root| {
                let mut reply_ids = self.descendants_of(root.id);
                reply_ids.sort_by_key(|id| position.get(id).copied().unwrap_or(usize::MAX));

                CommentThread {
                    comment: root.clone(),
                    author_name: author_name(author_names, root.user_id),
                    replies: reply_ids
                        .into_iter()
                        .filter_map(|id| self.records.get(&id))
                        .map(&entry)
                        .collect(),
                }
            })
            .collect()
    }
}

fn author_name(names: &HashMap<Uuid, String>, user_id: Uuid) -> String {
    names
        .get(&user_id)
        .cloned()
        .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
}
