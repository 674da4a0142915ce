//! Comment and reply submission, comment removal.
//!
//! All three routes take [`Identity`] first, so an anonymous visitor is sent to
//! the login page before the form body is even read.

use actix_web::{HttpResponse, web};

use quill_shared::dto::{CommentForm, DeleteCommentForm, ReplyForm};

use crate::flash::{NOT_FOUND_PATH, Redirect, redirect_on_error};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

fn non_empty(text: &str) -> Option<String> {
    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// POST /blog/comments
pub async fn add_comment(
    identity: Identity,
    state: web::Data<AppState>,
    form: web::Form<CommentForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let Some(description) = non_empty(&form.description) else {
        return Ok(Redirect::to(NOT_FOUND_PATH)
            .error("Comment cannot be empty")
            .finish());
    };

    match state
        .comments
        .add_comment(form.post_id, identity.user_id, description)
        .await
    {
        Ok((post, _)) => Ok(Redirect::to(format!("/blog/{}", post.slug)).finish()),
        Err(e) => redirect_on_error(e, NOT_FOUND_PATH),
    }
}

/// POST /blog/replies
pub async fn add_reply(
    identity: Identity,
    state: web::Data<AppState>,
    form: web::Form<ReplyForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let Some(description) = non_empty(&form.description) else {
        return Ok(Redirect::to(NOT_FOUND_PATH)
            .error("Reply cannot be empty")
            .finish());
    };

    match state
        .comments
        .add_reply(form.parent_comment_id, form.post_id, identity.user_id, description)
        .await
    {
        Ok((post, _)) => Ok(Redirect::to(format!("/blog/{}", post.slug)).finish()),
        Err(e) => redirect_on_error(e, NOT_FOUND_PATH),
    }
}

/// POST /blog/comments/delete
///
/// Any signed-in user may delete any comment; there is no ownership check.
pub async fn delete_comment(
    identity: Identity,
    state: web::Data<AppState>,
    form: web::Form<DeleteCommentForm>,
) -> AppResult<HttpResponse> {
    let comment_id = form.comment_id;
    tracing::warn!(
        comment_id,
        user_id = %identity.user_id,
        "Comment deletion without ownership check"
    );

    match state.comments.delete_comment(comment_id).await {
        Ok(_) => Ok(Redirect::to("/").success("Comment Deleted Successfully!").finish()),
        Err(e) => redirect_on_error(e, "/"),
    }
}
