//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{
    Cache, CommentRepository, EmailSender, ForumRepository, PostRepository, TagRepository,
    TokenService, UserRepository,
};
use quill_core::services::{
    AccountService, AccountSettings, CommentService, PostService, TagService,
};
use quill_infra::{
    Argon2PasswordService, InMemoryBlogStore, InMemoryCache, JwtTokenService, LogEmailSender,
};

#[cfg(feature = "rate-limit")]
use quill_core::ports::RateLimiter;
#[cfg(feature = "rate-limit")]
use quill_infra::InMemoryRateLimiter;

use crate::config::AppConfig;

/// Storage backends behind the services.
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub posts: Arc<dyn PostRepository>,
    pub comments: Arc<dyn CommentRepository>,
    pub tags: Arc<dyn TagRepository>,
    pub forum: Arc<dyn ForumRepository>,
    /// Reported by the health check.
    pub backend: &'static str,
}

impl Repositories {
    /// Every table in process memory.
    pub fn in_memory(store: Arc<InMemoryBlogStore>) -> Self {
        Self {
            users: store.clone(),
            posts: store.clone(),
            comments: store.clone(),
            tags: store.clone(),
            forum: store,
            backend: "memory",
        }
    }

    #[cfg(feature = "postgres")]
    pub async fn postgres(config: &quill_infra::database::DatabaseConfig, migrate: bool) -> Option<Self> {
        use quill_infra::database::{
            PostgresCommentRepository, PostgresForumRepository, PostgresPostRepository,
            PostgresTagRepository, PostgresUserRepository, connect,
        };

        let conn = match connect(config).await {
            Ok(conn) => conn,
            Err(e) => {
                tracing::error!(
                    "Failed to connect to database: {}. Using in-memory fallback.",
                    e
                );
                return None;
            }
        };

        if migrate {
            use migration::MigratorTrait;
            if let Err(e) = migration::Migrator::up(&conn, None).await {
                tracing::error!(error = %e, "Migrations failed; continuing with the current schema");
            } else {
                tracing::info!("Database migrations applied");
            }
        }

        Some(Self {
            users: Arc::new(PostgresUserRepository::new(conn.clone())),
            posts: Arc::new(PostgresPostRepository::new(conn.clone())),
            comments: Arc::new(PostgresCommentRepository::new(conn.clone())),
            tags: Arc::new(PostgresTagRepository::new(conn.clone())),
            forum: Arc::new(PostgresForumRepository::new(conn)),
            backend: "postgres",
        })
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub comments: CommentService,
    pub tags: TagService,
    pub accounts: AccountService,
    pub tokens: Arc<dyn TokenService>,
    pub storage_backend: &'static str,
    #[cfg(feature = "rate-limit")]
    pub login_limiter: Arc<dyn RateLimiter>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let repos = match &config.database {
            #[cfg(feature = "postgres")]
            Some(db_config) => match Repositories::postgres(db_config, config.run_migrations).await {
                Some(repos) => repos,
                None => Repositories::in_memory(Arc::new(InMemoryBlogStore::new())),
            },
            #[cfg(not(feature = "postgres"))]
            Some(_) => {
                tracing::info!("Running without postgres feature - using in-memory store");
                Repositories::in_memory(Arc::new(InMemoryBlogStore::new()))
            }
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Repositories::in_memory(Arc::new(InMemoryBlogStore::new()))
            }
        };

        let state = Self::from_parts(repos, mailer(config), config);
        tracing::info!("Application state initialized");
        state
    }

    /// Wire services over the given storage and mail transport.
    pub fn from_parts(repos: Repositories, mailer: Arc<dyn EmailSender>, config: &AppConfig) -> Self {
        let storage_backend = repos.backend;
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.jwt.clone()));
        // Reset tokens live in process memory; a restart voids outstanding links.
        let reset_tokens: Arc<dyn Cache> = Arc::new(InMemoryCache::new());

        let comments = CommentService::new(
            repos.comments.clone(),
            repos.posts.clone(),
            repos.users.clone(),
        );
        let posts = PostService::new(
            repos.posts.clone(),
            repos.tags.clone(),
            repos.users.clone(),
            comments.clone(),
        );
        let tags = TagService::new(repos.tags);
        let accounts = AccountService::new(
            repos.users,
            repos.posts,
            repos.comments,
            repos.forum,
            Arc::new(Argon2PasswordService::new()),
            tokens.clone(),
            reset_tokens,
            mailer,
            AccountSettings {
                public_url: config.public_url.clone(),
                reset_token_ttl: config.reset_token_ttl,
            },
        );

        Self {
            posts,
            comments,
            tags,
            accounts,
            tokens,
            storage_backend,
            #[cfg(feature = "rate-limit")]
            login_limiter: Arc::new(InMemoryRateLimiter::new(config.login_rate_limit.clone())),
        }
    }
}

#[cfg(feature = "smtp")]
fn mailer(config: &AppConfig) -> Arc<dyn EmailSender> {
    use quill_infra::SmtpEmailSender;

    match &config.smtp {
        Some(smtp) => match SmtpEmailSender::new(smtp) {
            Ok(sender) => Arc::new(sender),
            Err(e) => {
                tracing::error!(error = %e, "SMTP setup failed; reset emails will only be logged");
                Arc::new(LogEmailSender)
            }
        },
        None => {
            tracing::warn!("SMTP_HOST not set; reset emails will only be logged");
            Arc::new(LogEmailSender)
        }
    }
}

#[cfg(not(feature = "smtp"))]
fn mailer(_config: &AppConfig) -> Arc<dyn EmailSender> {
    Arc::new(LogEmailSender)
}
