//! Redirect-after-POST responses and the one-shot toast cookie they carry.

use std::future::{Ready, ready};

use actix_web::cookie::Cookie;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload};
use quill_core::DomainError;
use quill_shared::{ApiResponse, Toast};
use serde::Serialize;

use crate::middleware::error::AppResult;

pub const FLASH_COOKIE: &str = "flash";
pub const LOGIN_PATH: &str = "/login";
pub const NOT_FOUND_PATH: &str = "/not-found";

/// A `303 See Other` with an optional toast for the landing page.
pub struct Redirect {
    location: String,
    toast: Option<Toast>,
    cookies: Vec<Cookie<'static>>,
}

impl Redirect {
    pub fn to(location: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            toast: None,
            cookies: Vec::new(),
        }
    }

    pub fn success(mut self, message: impl Into<String>) -> Self {
        self.toast = Some(Toast::success(message));
        self
    }

    pub fn error(mut self, message: impl Into<String>) -> Self {
        self.toast = Some(Toast::error(message));
        self
    }

    pub fn cookie(mut self, cookie: Cookie<'static>) -> Self {
        self.cookies.push(cookie);
        self
    }

    pub fn finish(self) -> HttpResponse {
        let mut builder = HttpResponse::SeeOther();
        builder.insert_header((header::LOCATION, self.location));
        if let Some(toast) = self.toast {
            builder.cookie(Cookie::build(FLASH_COOKIE, toast.encode()).path("/").finish());
        }
        for cookie in self.cookies {
            builder.cookie(cookie);
        }
        builder.finish()
    }
}

/// Turn a failed use case into the redirect the visitor sees.
///
/// Messages the visitor can act on become an error toast on `location`;
/// a missing session goes to the login page; storage faults stay errors.
pub fn redirect_on_error(err: DomainError, location: &str) -> AppResult<HttpResponse> {
    match err {
        DomainError::Internal(_) | DomainError::Repo(_) => Err(err.into()),
        DomainError::Unauthorized => Ok(Redirect::to(LOGIN_PATH).error(err.user_message()).finish()),
        _ => Ok(Redirect::to(location).error(err.user_message()).finish()),
    }
}

/// The toast left by the previous redirect, if any.
pub struct Flash(pub Option<Toast>);

impl FromRequest for Flash {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let toast = req
            .cookie(FLASH_COOKIE)
            .and_then(|cookie| Toast::decode(cookie.value()));
        ready(Ok(Flash(toast)))
    }
}

/// Render a page payload, consuming the pending toast.
pub fn page<T: Serialize>(data: T, flash: Flash) -> HttpResponse {
    let mut builder = HttpResponse::Ok();
    if flash.0.is_some() {
        let mut removal = Cookie::build(FLASH_COOKIE, "").path("/").finish();
        removal.make_removal();
        builder.cookie(removal);
    }
    builder.json(ApiResponse::ok(data).with_flash(flash.0))
}
