//! PostgreSQL repository implementations.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, NotSet, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use quill_core::domain::{Comment, NewComment, NewPost, Post, Tag, User};
use quill_core::error::RepoError;
use quill_core::ports::{
    CommentRepository, ForumRepository, PostRepository, TagRepository, UserRepository,
};

use super::entity::answer::{self, Entity as AnswerEntity};
use super::entity::comment::{self, Entity as CommentEntity};
use super::entity::forum_post::{self, Entity as ForumPostEntity};
use super::entity::post::{self, Entity as PostEntity};
use super::entity::tag::{self, Entity as TagEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, repo_err};

pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;
pub type PostgresCommentRepository = PostgresBaseRepository<CommentEntity>;
pub type PostgresTagRepository = PostgresBaseRepository<TagEntity>;
pub type PostgresForumRepository = PostgresBaseRepository<ForumPostEntity>;

/// Keep PII out of the logs: `alice@example.com` becomes `a***@example.com`.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if local.chars().count() > 1 => {
            let first: String = local.chars().take(1).collect();
            format!("{first}***@{domain}")
        }
        Some((_, domain)) => format!("***@{domain}"),
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let result = UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list(&self) -> Result<Vec<User>, RepoError> {
        let result = UserEntity::find()
            .order_by_asc(user::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let active: user::ActiveModel = user.clone().into();

        UserEntity::insert(active)
            .on_conflict(
                OnConflict::column(user::Column::Id)
                    .update_columns([
                        user::Column::FirstName,
                        user::Column::LastName,
                        user::Column::Username,
                        user::Column::Email,
                        user::Column::PasswordHash,
                        user::Column::Role,
                        user::Column::IsActive,
                        user::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(user)
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .one(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.map(Into::into))
    }

    async fn list_recent(&self, limit: u64) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, RepoError> {
        let count = PostEntity::find()
            .filter(post::Column::Slug.eq(slug))
            .count(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(count > 0)
    }

    async fn create(&self, new_post: NewPost) -> Result<Post, RepoError> {
        let model = post::ActiveModel {
            id: NotSet,
            user_id: Set(new_post.user_id),
            tag_id: Set(new_post.tag_id),
            title: Set(new_post.title),
            slug: Set(new_post.slug),
            description: Set(new_post.description),
            thumbnail_url: Set(new_post.thumbnail_url),
            view_count: Set(0),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(repo_err)?;

        Ok(model.into())
    }

    async fn increment_view_count(&self, id: i32) -> Result<i32, RepoError> {
        let result = PostEntity::update_many()
            .col_expr(
                post::Column::ViewCount,
                Expr::col(post::Column::ViewCount).add(1),
            )
            .filter(post::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        let model = PostEntity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(repo_err)?
            .ok_or(RepoError::NotFound)?;

        Ok(model.view_count)
    }

    async fn delete_by_owner(&self, user_id: Uuid) -> Result<u64, RepoError> {
        let post_ids: Vec<i32> = PostEntity::find()
            .select_only()
            .column(post::Column::Id)
            .filter(post::Column::UserId.eq(user_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        if post_ids.is_empty() {
            return Ok(0);
        }

        let comments = CommentEntity::delete_many()
            .filter(comment::Column::PostId.is_in(post_ids.iter().copied()))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        let posts = PostEntity::delete_many()
            .filter(post::Column::Id.is_in(post_ids))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        tracing::debug!(
            %user_id,
            posts = posts.rows_affected,
            comments = comments.rows_affected,
            "Removed posts by owner"
        );
        Ok(posts.rows_affected)
    }
}

#[async_trait]
impl CommentRepository for PostgresCommentRepository {
    async fn find_by_post(&self, post_id: i32) -> Result<Vec<Comment>, RepoError> {
        let result = CommentEntity::find()
            .filter(comment::Column::PostId.eq(post_id))
            .order_by_asc(comment::Column::CreatedAt)
            .order_by_asc(comment::Column::Id)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn create(&self, new_comment: NewComment) -> Result<Comment, RepoError> {
        let model = comment::ActiveModel {
            id: NotSet,
            post_id: Set(new_comment.post_id),
            user_id: Set(new_comment.user_id),
            description: Set(new_comment.description),
            parent_comment_id: Set(new_comment.parent_comment_id),
            created_at: Set(new_comment.created_at.into()),
        }
        .insert(&self.db)
        .await
        .map_err(repo_err)?;

        Ok(model.into())
    }

    async fn delete_by_parent(&self, parent_id: i32) -> Result<u64, RepoError> {
        let result = CommentEntity::delete_many()
            .filter(comment::Column::ParentCommentId.eq(parent_id))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.rows_affected)
    }

    async fn delete_by_author(&self, user_id: Uuid) -> Result<u64, RepoError> {
        let authored: Vec<i32> = CommentEntity::find()
            .select_only()
            .column(comment::Column::Id)
            .filter(comment::Column::UserId.eq(user_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        if authored.is_empty() {
            return Ok(0);
        }

        // Other authors' replies survive as top-level comments.
        let promoted = CommentEntity::update_many()
            .col_expr(
                comment::Column::ParentCommentId,
                Expr::value(Option::<i32>::None),
            )
            .filter(comment::Column::ParentCommentId.is_in(authored))
            .filter(comment::Column::UserId.ne(user_id))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        let result = CommentEntity::delete_many()
            .filter(comment::Column::UserId.eq(user_id))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        tracing::debug!(
            %user_id,
            removed = result.rows_affected,
            promoted = promoted.rows_affected,
            "Removed comments by author"
        );
        Ok(result.rows_affected)
    }
}

#[async_trait]
impl TagRepository for PostgresTagRepository {
    async fn list(&self) -> Result<Vec<Tag>, RepoError> {
        let result = TagEntity::find()
            .order_by_asc(tag::Column::Id)
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn exists_by_name(&self, name: &str) -> Result<bool, RepoError> {
        let count = TagEntity::find()
            .filter(tag::Column::Name.eq(name))
            .count(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(count > 0)
    }

    async fn create(&self, name: &str) -> Result<Tag, RepoError> {
        let model = tag::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
        }
        .insert(&self.db)
        .await
        .map_err(repo_err)?;

        Ok(model.into())
    }
}

#[async_trait]
impl ForumRepository for PostgresForumRepository {
    async fn delete_by_owner(&self, user_id: Uuid) -> Result<u64, RepoError> {
        let forum_ids: Vec<i32> = ForumPostEntity::find()
            .select_only()
            .column(forum_post::Column::Id)
            .filter(forum_post::Column::UserId.eq(user_id))
            .into_tuple()
            .all(&self.db)
            .await
            .map_err(repo_err)?;

        if forum_ids.is_empty() {
            return Ok(0);
        }

        AnswerEntity::delete_many()
            .filter(answer::Column::ForumPostId.is_in(forum_ids.iter().copied()))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        let result = ForumPostEntity::delete_many()
            .filter(forum_post::Column::Id.is_in(forum_ids))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        Ok(result.rows_affected)
    }
}
