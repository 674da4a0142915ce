//! Authentication extractors and the session cookie.

use std::future::{Ready, ready};

use actix_web::cookie::{Cookie, SameSite, time::Duration as CookieDuration};
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, http::header, web};

use quill_core::domain::Role;
use quill_core::ports::{AuthError, TokenClaims};
use quill_shared::ErrorResponse;

use crate::flash::{LOGIN_PATH, Redirect};
use crate::middleware::error::AppError;
use crate::state::AppState;

pub const AUTH_COOKIE: &str = "auth_token";

/// Authenticated user identity extractor.
///
/// Reads the session cookie, or a Bearer token for API clients. Visitors
/// without a valid session are redirected to the login page:
/// ```ignore
/// async fn protected_route(identity: Identity) -> impl Responder {
///     format!("Hello, {}!", identity.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: uuid::Uuid,
    pub username: String,
    pub role: Role,
}

impl Identity {
    pub fn require_admin(&self) -> Result<(), AppError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            tracing::warn!(user_id = %self.user_id, "Admin route refused");
            Err(AppError::Forbidden)
        }
    }
}

impl From<TokenClaims> for Identity {
    fn from(claims: TokenClaims) -> Self {
        Self {
            user_id: claims.user_id,
            username: claims.username,
            role: claims.role,
        }
    }
}

/// Error type for authentication failures.
#[derive(Debug)]
pub struct AuthenticationError(pub AuthError);

impl std::fmt::Display for AuthenticationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl actix_web::ResponseError for AuthenticationError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        match &self.0 {
            AuthError::TokenExpired | AuthError::InvalidToken(_) | AuthError::MissingAuth => {
                actix_web::http::StatusCode::SEE_OTHER
            }
            AuthError::InsufficientPermissions => actix_web::http::StatusCode::FORBIDDEN,
            _ => actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match &self.0 {
            AuthError::MissingAuth => Redirect::to(LOGIN_PATH)
                .error("Please sign in first")
                .finish(),
            AuthError::TokenExpired | AuthError::InvalidToken(_) => Redirect::to(LOGIN_PATH)
                .error("Your session has expired. Please sign in again.")
                .cookie(expired_session_cookie())
                .finish(),
            AuthError::InsufficientPermissions => {
                HttpResponse::Forbidden().json(ErrorResponse::forbidden())
            }
            _ => HttpResponse::InternalServerError().json(ErrorResponse::internal_error()),
        }
    }
}

fn bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

fn authenticate(req: &HttpRequest) -> Result<Identity, AuthenticationError> {
    let Some(state) = req.app_data::<web::Data<AppState>>() else {
        tracing::error!("AppState not found in app data");
        return Err(AuthenticationError(AuthError::InvalidToken(
            "Server configuration error".to_string(),
        )));
    };

    let token = req
        .cookie(AUTH_COOKIE)
        .map(|c| c.value().to_string())
        .or_else(|| bearer_token(req))
        .ok_or(AuthenticationError(AuthError::MissingAuth))?;

    state
        .tokens
        .validate_token(&token)
        .map(Identity::from)
        .map_err(AuthenticationError)
}

impl FromRequest for Identity {
    type Error = AuthenticationError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// Optional identity extractor - doesn't fail if not authenticated.
pub struct OptionalIdentity(pub Option<Identity>);

impl FromRequest for OptionalIdentity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Ok(OptionalIdentity(authenticate(req).ok())))
    }
}

/// HttpOnly cookie carrying the session token.
pub fn session_cookie(token: String, max_age_secs: i64) -> Cookie<'static> {
    Cookie::build(AUTH_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(CookieDuration::seconds(max_age_secs))
        .finish()
}

/// Cookie that clears the session on the client.
pub fn expired_session_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(AUTH_COOKIE, "")
        .path("/")
        .http_only(true)
        .finish();
    cookie.make_removal();
    cookie
}
