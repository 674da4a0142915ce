//! HTTP handlers and route configuration.

mod account;
mod admin;
mod blog;
mod comments;
mod health;
mod views;

#[cfg(test)]
mod tests;

use actix_web::web;

use crate::state::AppState;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    cfg.route("/api/health", web::get().to(health::health_check))
        // Public pages
        .route("/", web::get().to(blog::home))
        .route("/blog/{slug}", web::get().to(blog::view_post))
        .route("/not-found", web::get().to(blog::not_found))
        // Authoring and discussion
        .route("/blog/posts", web::post().to(blog::create_post))
        .route("/blog/comments", web::post().to(comments::add_comment))
        .route("/blog/replies", web::post().to(comments::add_reply))
        .route("/blog/comments/delete", web::post().to(comments::delete_comment))
        // Admin area
        .service(
            web::scope("/admin")
                .route("/tags", web::get().to(admin::list_tags))
                .route("/tags", web::post().to(admin::create_tag))
                .route("/tags/delete", web::post().to(admin::delete_tag))
                .route("/users", web::get().to(admin::list_users))
                .route("/users/delete", web::post().to(admin::delete_user)),
        )
        // Accounts
        .route("/logout", web::post().to(account::logout))
        .route(
            "/forgot-password/confirmation",
            web::get().to(account::forgot_password_confirmation),
        )
        .route(
            "/forgot-password/error",
            web::get().to(account::forgot_password_error),
        )
        .route(
            "/reset-password/confirmation",
            web::get().to(account::reset_password_confirmation),
        );

    configure_credential_routes(cfg, state);
}

/// Routes that accept a password or reveal account existence are throttled per client.
#[cfg(feature = "rate-limit")]
fn configure_credential_routes(cfg: &mut web::ServiceConfig, state: &AppState) {
    use crate::middleware::rate_limit::RateLimitMiddleware;

    let limiter = || RateLimitMiddleware::new(state.login_limiter.clone());

    cfg.service(
        web::resource("/register")
            .wrap(limiter())
            .route(web::post().to(account::register)),
    )
    .service(
        web::resource("/login")
            .wrap(limiter())
            .route(web::post().to(account::login)),
    )
    .service(
        web::resource("/forgot-password")
            .wrap(limiter())
            .route(web::post().to(account::forgot_password)),
    )
    .service(
        web::resource("/reset-password")
            .wrap(limiter())
            .route(web::get().to(account::reset_password_form))
            .route(web::post().to(account::reset_password)),
    );
}

#[cfg(not(feature = "rate-limit"))]
fn configure_credential_routes(cfg: &mut web::ServiceConfig, _state: &AppState) {
    cfg.route("/register", web::post().to(account::register))
        .route("/login", web::post().to(account::login))
        .route("/forgot-password", web::post().to(account::forgot_password))
        .route("/reset-password", web::get().to(account::reset_password_form))
        .route("/reset-password", web::post().to(account::reset_password));
}
