//! Account lifecycle: registration, sign-in, password reset and removal.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use crate::domain::{Role, User};
use crate::error::{DomainError, RepoError};
use crate::ports::{
    Cache, CommentRepository, EmailMessage, EmailSender, ForumRepository, PasswordService,
    PostRepository, TokenService, UserRepository,
};

const RESET_KEY_PREFIX: &str = "password_reset:";
const MIN_PASSWORD_LEN: usize = 8;

/// Settings the account flows need from configuration.
#[derive(Debug, Clone)]
pub struct AccountSettings {
    /// Public base URL used in emailed links, without a trailing slash.
    pub public_url: String,
    pub reset_token_ttl: Duration,
}

/// Registration form contents.
#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub username: String,
    pub email: String,
    pub password: String,
}

/// A signed-in session.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
    pub expires_in: i64,
}

/// Counts from a cascading account removal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPurge {
    pub posts: u64,
    pub forum_posts: u64,
    pub comments: u64,
}

#[derive(Clone)]
pub struct AccountService {
    users: Arc<dyn UserRepository>,
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    forum: Arc<dyn ForumRepository>,
    passwords: Arc<dyn PasswordService>,
    tokens: Arc<dyn TokenService>,
    reset_tokens: Arc<dyn Cache>,
    mailer: Arc<dyn EmailSender>,
    settings: AccountSettings,
}

impl AccountService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        users: Arc<dyn UserRepository>,
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        forum: Arc<dyn ForumRepository>,
        passwords: Arc<dyn PasswordService>,
        tokens: Arc<dyn TokenService>,
        reset_tokens: Arc<dyn Cache>,
        mailer: Arc<dyn EmailSender>,
        settings: AccountSettings,
    ) -> Self {
        Self {
            users,
            posts,
            comments,
            forum,
            passwords,
            tokens,
            reset_tokens,
            mailer,
            settings,
        }
    }

    /// Create an author account.
    pub async fn register(&self, form: Registration) -> Result<User, DomainError> {
        let mut problems = Vec::new();
        if form.first_name.trim().is_empty() || form.last_name.trim().is_empty() {
            problems.push("First and last name are required");
        }
        if form.username.trim().is_empty() {
            problems.push("Username is required");
        }
        if !form.email.contains('@') {
            problems.push("Invalid email address");
        }
        if form.password.len() < MIN_PASSWORD_LEN {
            problems.push("Password must be at least 8 characters");
        }
        if !problems.is_empty() {
            return Err(DomainError::Validation(problems.join(", ")));
        }

        if self.users.find_by_email(&form.email).await?.is_some() {
            return Err(DomainError::Duplicate("This Email Already Exist!".to_string()));
        }
        if self.users.find_by_username(&form.username).await?.is_some() {
            return Err(DomainError::Duplicate(
                "This UserName Already Exist!".to_string(),
            ));
        }

        let password_hash = self
            .passwords
            .hash(&form.password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let user = User::new(
            form.first_name.trim().to_string(),
            form.last_name.trim().to_string(),
            form.username.trim().to_string(),
            form.email,
            password_hash,
            Role::Author,
        );
        let user = self.users.save(user).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Sign in by email or username.
    pub async fn login(&self, username_or_email: &str, password: &str) -> Result<Session, DomainError> {
        let user = match self.users.find_by_email(username_or_email).await? {
            Some(user) => user,
            None => self
                .users
                .find_by_username(username_or_email)
                .await?
                .ok_or_else(|| DomainError::not_found("Username or Email does not exist"))?,
        };

        let valid = self
            .passwords
            .verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        if !valid {
            tracing::warn!(user_id = %user.id, "Rejected sign-in with a wrong password");
            return Err(DomainError::Validation("Invalid password".to_string()));
        }

        if !user.is_active() {
            return Err(DomainError::Validation("This account is disabled".to_string()));
        }

        let token = self
            .tokens
            .generate_token(user.id, &user.username, user.role)
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        tracing::info!(user_id = %user.id, "User signed in");
        Ok(Session {
            user,
            token,
            expires_in: self.tokens.expiration_seconds(),
        })
    }

    /// Every account, for the admin listing.
    pub async fn list_users(&self) -> Result<Vec<User>, DomainError> {
        Ok(self.users.list().await?)
    }

    /// Issue a single-use reset token and mail the link to the account owner.
    pub async fn forgot_password(&self, email: &str) -> Result<(), DomainError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or_else(|| DomainError::not_found("No account uses this email"))?;

        let token = Uuid::new_v4().simple().to_string();
        self.reset_tokens
            .set(
                &reset_key(&token),
                &user.id.to_string(),
                Some(self.settings.reset_token_ttl),
            )
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        let callback = format!("{}/reset-password?token={}", self.settings.public_url, token);
        let message = EmailMessage::new(vec![user.email.clone()], "Reset password link", callback);
        self.mailer
            .send(message)
            .await
            .map_err(|e| DomainError::Internal(e.to_string()))?;

        tracing::info!(user_id = %user.id, "Password reset link sent");
        Ok(())
    }

    /// Set a new password with a previously mailed token.
    ///
    /// An unknown email is accepted without any change so the form does not
    /// reveal which addresses have accounts.
    pub async fn reset_password(
        &self,
        email: &str,
        token: &str,
        new_password: &str,
    ) -> Result<(), DomainError> {
        if new_password.len() < MIN_PASSWORD_LEN {
            return Err(DomainError::Validation(
                "Password must be at least 8 characters".to_string(),
            ));
        }

        let Some(mut user) = self.users.find_by_email(email).await? else {
            tracing::debug!("Password reset requested for an unknown email");
            return Ok(());
        };

        let key = reset_key(token);
        let owner = self.reset_tokens.get(&key).await;
        if owner.as_deref() != Some(user.id.to_string().as_str()) {
            return Err(DomainError::Validation(
                "Invalid or expired password reset token".to_string(),
            ));
        }
        // Single use: a concurrent reset that already consumed it loses.
        if self.reset_tokens.take(&key).await.is_none() {
            return Err(DomainError::Validation(
                "Invalid or expired password reset token".to_string(),
            ));
        }

        user.password_hash = self
            .passwords
            .hash(new_password)
            .map_err(|e| DomainError::Internal(e.to_string()))?;
        user.updated_at = chrono::Utc::now();
        let user = self.users.save(user).await?;

        tracing::info!(user_id = %user.id, "Password reset");
        Ok(())
    }

    /// Remove an account and everything it owns.
    ///
    /// Runs three independent passes (posts with their comments, forum posts
    /// with their answers, comments written elsewhere) and then removes the
    /// account. There is no rollback: a failing pass leaves earlier passes applied.
    pub async fn delete_user(&self, user_id: Uuid) -> Result<UserPurge, DomainError> {
        if self.users.find_by_id(user_id).await?.is_none() {
            return Err(DomainError::not_found("This User Is Not Exist!"));
        }

        let posts = self
            .posts
            .delete_by_owner(user_id)
            .await
            .inspect_err(|e| partial_failure(user_id, "posts", e))?;
        let forum_posts = self
            .forum
            .delete_by_owner(user_id)
            .await
            .inspect_err(|e| partial_failure(user_id, "forum posts", e))?;
        let comments = self
            .comments
            .delete_by_author(user_id)
            .await
            .inspect_err(|e| partial_failure(user_id, "comments", e))?;

        self.users.delete(user_id).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("This User Is Not Exist!"),
            other => {
                partial_failure(user_id, "account", &other);
                other.into()
            }
        })?;

        let purge = UserPurge {
            posts,
            forum_posts,
            comments,
        };
        tracing::info!(
            %user_id,
            posts = purge.posts,
            forum_posts = purge.forum_posts,
            comments = purge.comments,
            "User deleted"
        );
        Ok(purge)
    }
}

fn reset_key(token: &str) -> String {
    format!("{RESET_KEY_PREFIX}{token}")
}

fn partial_failure(user_id: Uuid, stage: &str, err: &RepoError) {
    tracing::error!(%user_id, stage, error = %err, "User deletion stopped part way");
}
