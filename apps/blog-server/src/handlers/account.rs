//! Registration, sign-in and password reset.

use actix_web::{HttpResponse, web};
use serde::Serialize;

use quill_core::DomainError;
use quill_core::services::Registration;
use quill_shared::dto::{
    ForgotPasswordForm, LoginForm, MessagePage, RegisterForm, ResetLinkQuery, ResetPasswordForm,
};

use crate::flash::{Flash, LOGIN_PATH, Redirect, page, redirect_on_error};
use crate::middleware::auth::{expired_session_cookie, session_cookie};
use crate::middleware::error::AppResult;
use crate::state::AppState;

const REGISTER_PATH: &str = "/register";
const FORGOT_CONFIRMATION_PATH: &str = "/forgot-password/confirmation";
const FORGOT_ERROR_PATH: &str = "/forgot-password/error";
const RESET_CONFIRMATION_PATH: &str = "/reset-password/confirmation";

/// POST /register
pub async fn register(
    state: web::Data<AppState>,
    form: web::Form<RegisterForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    let registration = Registration {
        first_name: form.first_name,
        last_name: form.last_name,
        username: form.username,
        email: form.email,
        password: form.password,
    };

    match state.accounts.register(registration).await {
        Ok(_) => Ok(Redirect::to(LOGIN_PATH)
            .success("User Created Successfully!")
            .finish()),
        Err(e) => redirect_on_error(e, REGISTER_PATH),
    }
}

/// POST /login
pub async fn login(
    state: web::Data<AppState>,
    form: web::Form<LoginForm>,
) -> AppResult<HttpResponse> {
    match state
        .accounts
        .login(form.username_or_email.trim(), &form.password)
        .await
    {
        Ok(session) => Ok(Redirect::to("/")
            .success("Logged In Successfully!")
            .cookie(session_cookie(session.token, session.expires_in))
            .finish()),
        Err(e) => redirect_on_error(e, LOGIN_PATH),
    }
}

/// POST /logout
pub async fn logout() -> HttpResponse {
    Redirect::to("/")
        .success("You logged out successfully!")
        .cookie(expired_session_cookie())
        .finish()
}

/// POST /forgot-password
pub async fn forgot_password(
    state: web::Data<AppState>,
    form: web::Form<ForgotPasswordForm>,
) -> AppResult<HttpResponse> {
    match state.accounts.forgot_password(form.email.trim()).await {
        Ok(()) => Ok(Redirect::to(FORGOT_CONFIRMATION_PATH).finish()),
        Err(DomainError::NotFound(_)) => Ok(Redirect::to(FORGOT_ERROR_PATH).finish()),
        Err(e) => redirect_on_error(e, FORGOT_ERROR_PATH),
    }
}

#[derive(Serialize)]
struct ResetPasswordPage {
    token: String,
}

/// GET /reset-password?token=..
///
/// Landing page of the mailed link; the form posts the token back.
pub async fn reset_password_form(query: web::Query<ResetLinkQuery>, flash: Flash) -> HttpResponse {
    page(
        ResetPasswordPage {
            token: query.into_inner().token,
        },
        flash,
    )
}

/// POST /reset-password
pub async fn reset_password(
    state: web::Data<AppState>,
    form: web::Form<ResetPasswordForm>,
) -> AppResult<HttpResponse> {
    let form = form.into_inner();
    match state
        .accounts
        .reset_password(form.email.trim(), &form.token, &form.password)
        .await
    {
        Ok(()) => Ok(Redirect::to(RESET_CONFIRMATION_PATH).finish()),
        Err(e) => {
            // Issued tokens are hex; anything else is not worth echoing back.
            let back = if form.token.chars().all(|c| c.is_ascii_alphanumeric()) {
                format!("/reset-password?token={}", form.token)
            } else {
                FORGOT_ERROR_PATH.to_string()
            };
            redirect_on_error(e, &back)
        }
    }
}

/// GET /forgot-password/confirmation
pub async fn forgot_password_confirmation(flash: Flash) -> HttpResponse {
    page(
        MessagePage::new(
            "Forgot password confirmation",
            "Please check your email to reset your password.",
        ),
        flash,
    )
}

/// GET /forgot-password/error
pub async fn forgot_password_error(flash: Flash) -> HttpResponse {
    page(
        MessagePage::new(
            "Forgot password",
            "No account uses this email address.",
        ),
        flash,
    )
}

/// GET /reset-password/confirmation
pub async fn reset_password_confirmation(flash: Flash) -> HttpResponse {
    page(
        MessagePage::new(
            "Reset password confirmation",
            "Your password has been reset. You can now sign in.",
        ),
        flash,
    )
}
