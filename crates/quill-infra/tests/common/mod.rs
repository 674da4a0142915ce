//! Service wiring over the in-memory store, shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use quill_core::domain::{Post, Role, User};
use quill_core::ports::{BaseRepository, UserRepository};
use quill_core::services::{
    AccountService, AccountSettings, CommentService, PostDraft, PostService, TagService,
};
use quill_infra::{
    Argon2PasswordService, InMemoryBlogStore, InMemoryCache, JwtConfig, JwtTokenService,
    RecordingEmailSender,
};
use uuid::Uuid;

pub const PUBLIC_URL: &str = "http://blog.test";

pub struct Blog {
    pub store: Arc<InMemoryBlogStore>,
    pub mailer: Arc<RecordingEmailSender>,
    pub comments: CommentService,
    pub posts: PostService,
    pub tags: TagService,
    pub accounts: AccountService,
}

impl Blog {
    pub fn new() -> Self {
        let store = Arc::new(InMemoryBlogStore::new());
        let mailer = Arc::new(RecordingEmailSender::new());

        let comments = CommentService::new(store.clone(), store.clone(), store.clone());
        let posts = PostService::new(store.clone(), store.clone(), store.clone(), comments.clone());
        let tags = TagService::new(store.clone());
        let accounts = AccountService::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store.clone(),
            Arc::new(Argon2PasswordService::new()),
            Arc::new(JwtTokenService::new(JwtConfig {
                secret: "integration-secret".to_string(),
                ..JwtConfig::default()
            })),
            Arc::new(InMemoryCache::new()),
            mailer.clone(),
            AccountSettings {
                public_url: PUBLIC_URL.to_string(),
                reset_token_ttl: Duration::from_secs(60),
            },
        );

        Self {
            store,
            mailer,
            comments,
            posts,
            tags,
            accounts,
        }
    }

    /// Store an account directly, skipping password hashing.
    pub async fn user(&self, first: &str, last: &str) -> User {
        let username = first.to_lowercase();
        let user = User::new(
            first.to_string(),
            last.to_string(),
            username.clone(),
            format!("{username}@example.com"),
            "unused".to_string(),
            Role::Author,
        );
        UserRepository::save(self.store.as_ref(), user).await.unwrap()
    }

    pub async fn post(&self, author: &User, title: &str) -> Post {
        self.posts
            .create_post(
                author.id,
                PostDraft {
                    title: title.to_string(),
                    description: format!("{title} body"),
                    thumbnail_url: None,
                    tag_id: None,
                },
            )
            .await
            .unwrap()
    }

    pub async fn post_exists(&self, id: i32) -> bool {
        BaseRepository::<Post, i32>::find_by_id(self.store.as_ref(), id)
            .await
            .unwrap()
            .is_some()
    }

    pub async fn user_exists(&self, id: Uuid) -> bool {
        BaseRepository::<User, Uuid>::find_by_id(self.store.as_ref(), id)
            .await
            .unwrap()
            .is_some()
    }
}
