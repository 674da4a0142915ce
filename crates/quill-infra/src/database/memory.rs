//! Process-local blog store. Used when no `DATABASE_URL` is configured and by
//! the service tests. Mirrors the foreign-key behaviour of the SQL schema.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{Answer, Comment, ForumPost, NewComment, NewPost, Post, Tag, User};
use quill_core::error::RepoError;
use quill_core::ports::{
    BaseRepository, CommentRepository, ForumRepository, PostRepository, TagRepository,
    UserRepository,
};

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    posts: HashMap<i32, Post>,
    comments: HashMap<i32, Comment>,
    tags: HashMap<i32, Tag>,
    forum_posts: HashMap<i32, ForumPost>,
    answers: HashMap<i32, Answer>,
    next_post_id: i32,
    next_comment_id: i32,
    next_tag_id: i32,
    next_forum_id: i32,
    next_answer_id: i32,
}

fn next_id(counter: &mut i32) -> i32 {
    *counter += 1;
    *counter
}

/// All blog tables behind one async lock so cascades are atomic.
#[derive(Default)]
pub struct InMemoryBlogStore {
    tables: RwLock<Tables>,
}

impl InMemoryBlogStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a forum post directly; the blog has no forum routes.
    pub async fn insert_forum_post(&self, user_id: Uuid, title: &str, description: &str) -> ForumPost {
        let mut t = self.tables.write().await;
        let forum_post = ForumPost {
            id: next_id(&mut t.next_forum_id),
            user_id,
            title: title.to_string(),
            description: description.to_string(),
            created_at: Utc::now(),
        };
        t.forum_posts.insert(forum_post.id, forum_post.clone());
        forum_post
    }

    pub async fn insert_answer(&self, forum_post_id: i32, user_id: Uuid, description: &str) -> Answer {
        let mut t = self.tables.write().await;
        let answer = Answer {
            id: next_id(&mut t.next_answer_id),
            forum_post_id,
            user_id,
            description: description.to_string(),
            created_at: Utc::now(),
        };
        t.answers.insert(answer.id, answer.clone());
        answer
    }

    pub async fn forum_post_count(&self) -> usize {
        self.tables.read().await.forum_posts.len()
    }

    pub async fn answer_count(&self) -> usize {
        self.tables.read().await.answers.len()
    }

    pub async fn comment_count(&self) -> usize {
        self.tables.read().await.comments.len()
    }

    pub async fn post_count(&self) -> usize {
        self.tables.read().await.posts.len()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryBlogStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn delete(&self, id: Uuid) -> Result<(), RepoError> {
        let mut t = self.tables.write().await;
        t.users.remove(&id).ok_or(RepoError::NotFound)?;

        // ON DELETE CASCADE from users
        let owned_posts: HashSet<i32> = t
            .posts
            .values()
            .filter(|p| p.user_id == id)
            .map(|p| p.id)
            .collect();
        t.posts.retain(|pid, _| !owned_posts.contains(pid));
        t.comments
            .retain(|_, c| c.user_id != id && !owned_posts.contains(&c.post_id));
        let owned_forum: HashSet<i32> = t
            .forum_posts
            .values()
            .filter(|f| f.user_id == id)
            .map(|f| f.id)
            .collect();
        t.forum_posts.retain(|fid, _| !owned_forum.contains(fid));
        t.answers.retain(|_, a| !owned_forum.contains(&a.forum_post_id));
        Ok(())
    }
}

#[async_trait]
impl UserRepository for InMemoryBlogStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let t = self.tables.read().await;
        Ok(t.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let t = self.tables.read().await;
        Ok(ids.iter().filter_map(|id| t.users.get(id).cloned()).collect())
    }

    async fn list(&self) -> Result<Vec<User>, RepoError> {
        let t = self.tables.read().await;
        let mut users: Vec<User> = t.users.values().cloned().collect();
        users.sort_by_key(|u| u.created_at);
        Ok(users)
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut t = self.tables.write().await;
        let clash = t.users.values().any(|u| {
            u.id != user.id && (u.username == user.username || u.email == user.email)
        });
        if clash {
            return Err(RepoError::Constraint(
                "duplicate key value violates unique constraint on users".to_string(),
            ));
        }
        t.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl BaseRepository<Post, i32> for InMemoryBlogStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Post>, RepoError> {
        Ok(self.tables.read().await.posts.get(&id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let mut t = self.tables.write().await;
        t.posts.remove(&id).ok_or(RepoError::NotFound)?;
        t.comments.retain(|_, c| c.post_id != id);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for InMemoryBlogStore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let t = self.tables.read().await;
        Ok(t.posts.values().find(|p| p.slug == slug).cloned())
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<Post>, RepoError> {
        let t = self.tables.read().await;
        let mut posts: Vec<Post> = t.posts.values().cloned().collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        posts.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(posts)
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        let t = self.tables.read().await;
        Ok(t.posts.values().any(|p| p.slug == slug))
    }

    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let mut t = self.tables.write().await;
        if t.posts.values().any(|p| p.slug == new_post.slug) {
            return Err(RepoError::Constraint(format!(
                "duplicate key value violates unique constraint: slug {}",
                new_post.slug
            )));
        }
        if !t.users.contains_key(&new_post.user_id) {
            return Err(RepoError::Constraint("posts.user_id references no user".to_string()));
        }
        let post = Post {
            id: next_id(&mut t.next_post_id),
            user_id: new_post.user_id,
            tag_id: new_post.tag_id,
            title: new_post.title,
            slug: new_post.slug,
            description: new_post.description,
            thumbnail_url: new_post.thumbnail_url,
            view_count: 0,
            created_at: Utc::now(),
        };
        t.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn increment_view_count(&self, id: i32) -> Result<i32, RepoError> {
        let mut t = self.tables.write().await;
        let post = t.posts.get_mut(&id).ok_or(RepoError::NotFound)?;
        post.view_count += 1;
        Ok(post.view_count)
    }

    async fn delete_by_owner(&self, user_id: Uuid) -> Result<u64, RepoError> {
        let mut t = self.tables.write().await;
        let owned: HashSet<i32> = t
            .posts
            .values()
            .filter(|p| p.user_id == user_id)
            .map(|p| p.id)
            .collect();
        t.comments.retain(|_, c| !owned.contains(&c.post_id));
        t.posts.retain(|id, _| !owned.contains(id));
        Ok(owned.len() as u64)
    }
}

#[async_trait]
impl BaseRepository<Comment, i32> for InMemoryBlogStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Comment>, RepoError> {
        Ok(self.tables.read().await.comments.get(&id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let mut t = self.tables.write().await;
        if t.comments.values().any(|c| c.parent_comment_id == Some(id)) {
            return Err(RepoError::Constraint(format!(
                "comment {id} is still referenced by replies"
            )));
        }
        t.comments.remove(&id).ok_or(RepoError::NotFound)?;
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for InMemoryBlogStore {
    async fn find_by_post(&self, post_id: i32) -> Result<Vec<Comment>, RepoError> {
        let t = self.tables.read().await;
        let mut comments: Vec<Comment> = t
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn create(&self, new_comment: NewComment) -> Result<Comment, RepoError> {
        let mut t = self.tables.write().await;
        if !t.posts.contains_key(&new_comment.post_id) {
            return Err(RepoError::Constraint("comments.post_id references no post".to_string()));
        }
        if let Some(parent) = new_comment.parent_comment_id
            && !t.comments.contains_key(&parent)
        {
            return Err(RepoError::Constraint(
                "comments.parent_comment_id references no comment".to_string(),
            ));
        }
        let comment = Comment {
            id: next_id(&mut t.next_comment_id),
            post_id: new_comment.post_id,
            user_id: new_comment.user_id,
            description: new_comment.description,
            parent_comment_id: new_comment.parent_comment_id,
            created_at: new_comment.created_at,
        };
        t.comments.insert(comment.id, comment.clone());
        Ok(comment)
    }

    async fn delete_by_parent(&self, parent_id: i32) -> Result<u64, RepoError> {
        let mut t = self.tables.write().await;
        let children: HashSet<i32> = t
            .comments
            .values()
            .filter(|c| c.parent_comment_id == Some(parent_id))
            .map(|c| c.id)
            .collect();
        if t
            .comments
            .values()
            .any(|c| c.parent_comment_id.is_some_and(|p| children.contains(&p)))
        {
            return Err(RepoError::Constraint(format!(
                "replies to comment {parent_id} still have replies of their own"
            )));
        }
        t.comments.retain(|id, _| !children.contains(id));
        Ok(children.len() as u64)
    }

    async fn delete_by_author(&self, user_id: Uuid) -> Result<u64, RepoError> {
        let mut t = self.tables.write().await;
        let authored: HashSet<i32> = t
            .comments
            .values()
            .filter(|c| c.user_id == user_id)
            .map(|c| c.id)
            .collect();
        // Other authors' replies stay, promoted to top level.
        for reply in t.comments.values_mut().filter(|c| {
            c.user_id != user_id && c.parent_comment_id.is_some_and(|p| authored.contains(&p))
        }) {
            reply.parent_comment_id = None;
        }
        t.comments.retain(|id, _| !authored.contains(id));
        Ok(authored.len() as u64)
    }
}

#[async_trait]
impl BaseRepository<Tag, i32> for InMemoryBlogStore {
    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, RepoError> {
        Ok(self.tables.read().await.tags.get(&id).cloned())
    }

    async fn delete(&self, id: i32) -> Result<(), RepoError> {
        let mut t = self.tables.write().await;
        t.tags.remove(&id).ok_or(RepoError::NotFound)?;
        // ON DELETE SET NULL
        for post in t.posts.values_mut().filter(|p| p.tag_id == Some(id)) {
            post.tag_id = None;
        }
        Ok(())
    }
}

#[async_trait]
impl TagRepository for InMemoryBlogStore {
    async fn list(&self) -> Result<Vec<Tag>, RepoError> {
        let t = self.tables.read().await;
        let mut tags: Vec<Tag> = t.tags.values().cloned().collect();
        tags.sort_by_key(|tag| tag.id);
        Ok(tags)
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, RepoError> {
        let t = self.tables.read().await;
        Ok(t.tags.values().any(|tag| tag.name == name))
    }

    async fn create(&self, name: &str) -> Result<Tag, RepoError> {
        let mut t = self.tables.write().await;
        if t.tags.values().any(|tag| tag.name == name) {
            return Err(RepoError::Constraint(format!(
                "duplicate key value violates unique constraint: tag {name}"
            )));
        }
        let tag = Tag {
            id: next_id(&mut t.next_tag_id),
            name: name.to_string(),
        };
        t.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }
}

#[async_trait]
impl ForumRepository for InMemoryBlogStore {
    async fn delete_by_owner(&self, user_id: Uuid) -> Result<u64, RepoError> {
        let mut t = self.tables.write().await;
        let owned: HashSet<i32> = t
            .forum_posts
            .values()
            .filter(|f| f.user_id == user_id)
            .map(|f| f.id)
            .collect();
        t.answers.retain(|_, a| !owned.contains(&a.forum_post_id));
        t.forum_posts.retain(|id, _| !owned.contains(id));
        Ok(owned.len() as u64)
    }
}
