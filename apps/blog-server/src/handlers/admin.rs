//! Admin area: tags and user accounts.

use actix_web::{HttpResponse, web};

use quill_shared::dto::{DeleteTagForm, DeleteUserForm, TagForm, TagResponse, UserResponse};

use super::views;
use crate::flash::{Flash, Redirect, page, redirect_on_error};
use crate::middleware::auth::Identity;
use crate::middleware::error::AppResult;
use crate::state::AppState;

const TAGS_PATH: &str = "/admin/tags";
const USERS_PATH: &str = "/admin/users";

/// GET /admin/tags
pub async fn list_tags(
    _identity: Identity,
    state: web::Data<AppState>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    let tags: Vec<TagResponse> = state
        .tags
        .list()
        .await?
        .into_iter()
        .map(views::tag)
        .collect();

    Ok(page(tags, flash))
}

/// POST /admin/tags
pub async fn create_tag(
    _identity: Identity,
    state: web::Data<AppState>,
    form: web::Form<TagForm>,
) -> AppResult<HttpResponse> {
    match state.tags.create(&form.name).await {
        Ok(_) => Ok(Redirect::to(TAGS_PATH)
            .success("Tag Created Successfully!")
            .finish()),
        Err(e) => redirect_on_error(e, TAGS_PATH),
    }
}

/// POST /admin/tags/delete
pub async fn delete_tag(
    _identity: Identity,
    state: web::Data<AppState>,
    form: web::Form<DeleteTagForm>,
) -> AppResult<HttpResponse> {
    match state.tags.delete(form.id).await {
        Ok(()) => Ok(Redirect::to(TAGS_PATH)
            .success("Tag Deleted Successfully!")
            .finish()),
        Err(e) => redirect_on_error(e, TAGS_PATH),
    }
}

/// GET /admin/users
pub async fn list_users(
    identity: Identity,
    state: web::Data<AppState>,
    flash: Flash,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;

    let users: Vec<UserResponse> = state
        .accounts
        .list_users()
        .await?
        .into_iter()
        .map(views::user)
        .collect();

    Ok(page(users, flash))
}

/// POST /admin/users/delete
pub async fn delete_user(
    identity: Identity,
    state: web::Data<AppState>,
    form: web::Form<DeleteUserForm>,
) -> AppResult<HttpResponse> {
    identity.require_admin()?;

    match state.accounts.delete_user(form.user_id).await {
        Ok(_) => Ok(Redirect::to(USERS_PATH)
            .success("Delete User Successfully!")
            .finish()),
        Err(e @ (quill_core::DomainError::Repo(_) | quill_core::DomainError::Internal(_))) => {
            tracing::error!(user_id = %form.user_id, error = %e, "Delete user failed");
            Ok(Redirect::to(USERS_PATH).error("Delete User Fail!").finish())
        }
        Err(e) => redirect_on_error(e, USERS_PATH),
    }
}
