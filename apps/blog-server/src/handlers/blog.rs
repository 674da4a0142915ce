//! Public blog pages and post authoring.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use quill_core::services::PostDraft;
use quill_shared::dto::{CreatePostForm, MessagePage, PostSummary};

use super::views;
use crate::flash::{Flash, NOT_FOUND_PATH, Redirect, page, redirect_on_error};
use crate::middleware::auth::{Identity, OptionalIdentity};
use crate::middleware::error::AppResult;
use crate::state::AppState;

const HOME_PAGE_SIZE: u64 = 10;

#[derive(Serialize)]
struct HomePage {
    signed_in_as: Option<String>,
    posts: Vec<PostSummary>,
}

/// GET /
pub async fn home(
    state: web::Data<AppState>,
    identity: OptionalIdentity,
    flash: Flash,
) -> AppResult<HttpResponse> {
    let posts = state.posts.recent(HOME_PAGE_SIZE).await?;

    Ok(page(
        HomePage {
            signed_in_as: identity.0.map(|i| i.username),
            posts: posts.into_iter().map(views::post_summary).collect(),
        },
        flash,
    ))
}

/// GET /blog/{slug}
pub async fn view_post(
    state: web::Data<AppState>,
    slug: web::Path<String>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    match state.posts.view_post(&slug).await {
        Ok(view) => Ok(page(views::blog_post(view), flash)),
        Err(e) => redirect_on_error(e, NOT_FOUND_PATH),
    }
}

/// POST /blog/posts
pub async fn create_post(
    identity: Identity,
    state: web::Data<AppState>,
    form: web::Form<CreatePostForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let draft = PostDraft {
        title: form.title,
        description: form.description,
        thumbnail_url: form.thumbnail_url.filter(|url| !url.trim().is_empty()),
        tag_id: form.tag_id,
    };

    match state.posts.create_post(identity.user_id, draft).await {
        Ok(post) => Ok(Redirect::to(format!("/blog/{}", post.slug))
            .success("Post Created Successfully!")
            .finish()),
        Err(e) => redirect_on_error(e, "/"),
    }
}

/// GET /not-found
pub async fn not_found(flash: Flash) -> HttpResponse {
    let message = flash
        .0
        .as_ref()
        .map(|toast| toast.message.clone())
        .unwrap_or_else(|| "The page you are looking for does not exist.".to_string());

    page(MessagePage::new("Not Found", message), flash)
}
