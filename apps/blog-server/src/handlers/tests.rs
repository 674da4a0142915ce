use std::sync::Arc;
use std::time::Duration;

use actix_web::cookie::Cookie;
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use serde_json::Value;
use uuid::Uuid;

use quill_core::domain::{Role, User};
use quill_core::ports::UserRepository;
use quill_core::services::{PostDraft, Registration};
use quill_infra::{InMemoryBlogStore, JwtConfig, RecordingEmailSender};
use quill_shared::dto::{
    CommentForm, DeleteCommentForm, DeleteUserForm, LoginForm, RegisterForm, ReplyForm,
};

use super::configure_routes;
use crate::config::AppConfig;
use crate::middleware::auth::AUTH_COOKIE;
use crate::state::{AppState, Repositories};

fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        public_url: "http://blog.test".to_string(),
        database: None,
        run_migrations: false,
        jwt: JwtConfig {
            secret: "handler-test-secret".to_string(),
            ..JwtConfig::default()
        },
        reset_token_ttl: Duration::from_secs(60),
        #[cfg(feature = "rate-limit")]
        login_rate_limit: quill_infra::RateLimitConfig::default(),
        #[cfg(feature = "smtp")]
        smtp: None,
    }
}

struct Fixture {
    store: Arc<InMemoryBlogStore>,
    state: AppState,
}

impl Fixture {
    fn new() -> Self {
        let store = Arc::new(InMemoryBlogStore::new());
        let state = AppState::from_parts(
            Repositories::in_memory(store.clone()),
            Arc::new(RecordingEmailSender::new()),
            &test_config(),
        );
        Self { store, state }
    }

    async fn user(&self, username: &str, role: Role) -> User {
        let user = User::new(
            username.to_string(),
            "Tester".to_string(),
            username.to_string(),
            format!("{username}@example.com"),
            "unused".to_string(),
            role,
        );
        UserRepository::save(self.store.as_ref(), user).await.unwrap()
    }

    fn session(&self, user: &User) -> Cookie<'static> {
        let token = self
            .state
            .tokens
            .generate_token(user.id, &user.username, user.role)
            .unwrap();
        Cookie::new(AUTH_COOKIE, token)
    }

    async fn post(&self, author: &User, title: &str) -> i32 {
        self.state
            .posts
            .create_post(
                author.id,
                PostDraft {
                    title: title.to_string(),
                    description: "Body".to_string(),
                    thumbnail_url: None,
                    tag_id: None,
                },
            )
            .await
            .unwrap()
            .id
    }
}

/// Service with every route mounted over the fixture's state.
macro_rules! init_app {
    ($fixture:expr) => {{
        let state: AppState = $fixture.state.clone();
        test::init_service(
            App::new()
                .app_data(web::Data::new(state.clone()))
                .configure(move |cfg| configure_routes(cfg, &state)),
        )
        .await
    }};
}

fn location(resp: &ServiceResponse) -> &str {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
}

#[actix_web::test]
async fn test_health_check() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    let req = test::TestRequest::get().uri("/api/health").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[actix_web::test]
async fn test_anonymous_comment_is_sent_to_login() {
    let fixture = Fixture::new();
    let author = fixture.user("ada", Role::Author).await;
    let post_id = fixture.post(&author, "Hello World").await;
    let app = init_app!(fixture);

    let req = test::TestRequest::post()
        .uri("/blog/comments")
        .set_form(CommentForm {
            post_id,
            description: "First!".to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/login");
    assert_eq!(fixture.store.comment_count().await, 0);
}

#[actix_web::test]
async fn test_comment_and_reply_render_as_thread() {
    let fixture = Fixture::new();
    let author = fixture.user("ada", Role::Author).await;
    let reader = fixture.user("grace", Role::Author).await;
    let post_id = fixture.post(&author, "Hello World").await;
    let app = init_app!(fixture);

    let req = test::TestRequest::post()
        .uri("/blog/comments")
        .cookie(fixture.session(&reader))
        .set_form(CommentForm {
            post_id,
            description: "  Nice post  ".to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/blog/hello-world");

    let req = test::TestRequest::get().uri("/blog/hello-world").to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    let parent_id = page["data"]["comments"][0]["id"].as_i64().unwrap() as i32;

    let req = test::TestRequest::post()
        .uri("/blog/replies")
        .cookie(fixture.session(&author))
        .set_form(ReplyForm {
            parent_comment_id: parent_id,
            post_id,
            description: "Thanks".to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/blog/hello-world");

    let req = test::TestRequest::get().uri("/blog/hello-world").to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;
    let thread = &page["data"]["comments"][0];

    assert_eq!(page["data"]["comments"].as_array().unwrap().len(), 1);
    assert_eq!(thread["description"], "Nice post");
    assert_eq!(thread["author_name"], "grace Tester");
    assert_eq!(thread["replies"][0]["description"], "Thanks");
    assert_eq!(thread["replies"][0]["parent_comment_id"], parent_id);
}

#[actix_web::test]
async fn test_empty_comment_is_rejected() {
    let fixture = Fixture::new();
    let author = fixture.user("ada", Role::Author).await;
    let post_id = fixture.post(&author, "Hello World").await;
    let app = init_app!(fixture);

    let req = test::TestRequest::post()
        .uri("/blog/comments")
        .cookie(fixture.session(&author))
        .set_form(CommentForm {
            post_id,
            description: "   ".to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(location(&resp), "/not-found");
    assert_eq!(fixture.store.comment_count().await, 0);
}

#[actix_web::test]
async fn test_delete_comment_takes_replies_along() {
    let fixture = Fixture::new();
    let author = fixture.user("ada", Role::Author).await;
    let post_id = fixture.post(&author, "Hello World").await;
    let (_, top) = fixture
        .state
        .comments
        .add_comment(post_id, author.id, "Top".to_string())
        .await
        .unwrap();
    let (_, reply) = fixture
        .state
        .comments
        .add_reply(top.id, post_id, author.id, "Reply".to_string())
        .await
        .unwrap();
    fixture
        .state
        .comments
        .add_reply(reply.id, post_id, author.id, "Deeper".to_string())
        .await
        .unwrap();
    let app = init_app!(fixture);

    let req = test::TestRequest::post()
        .uri("/blog/comments/delete")
        .cookie(fixture.session(&author))
        .set_form(DeleteCommentForm { comment_id: top.id })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/");
    assert_eq!(fixture.store.comment_count().await, 0);
}

#[actix_web::test]
async fn test_missing_post_redirects_to_not_found() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    let req = test::TestRequest::get().uri("/blog/no-such-post").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/not-found");
}

#[actix_web::test]
async fn test_user_admin_requires_admin_role() {
    let fixture = Fixture::new();
    let author = fixture.user("ada", Role::Author).await;
    let admin = fixture.user("root", Role::Admin).await;
    let app = init_app!(fixture);

    let req = test::TestRequest::get()
        .uri("/admin/users")
        .cookie(fixture.session(&author))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/admin/users")
        .cookie(fixture.session(&admin))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);
}

#[actix_web::test]
async fn test_admin_deletes_user_with_content() {
    let fixture = Fixture::new();
    let admin = fixture.user("root", Role::Admin).await;
    let author = fixture.user("ada", Role::Author).await;
    let post_id = fixture.post(&author, "Hello World").await;
    fixture
        .state
        .comments
        .add_comment(post_id, admin.id, "Keep writing".to_string())
        .await
        .unwrap();
    let app = init_app!(fixture);

    let req = test::TestRequest::post()
        .uri("/admin/users/delete")
        .cookie(fixture.session(&admin))
        .set_form(DeleteUserForm { user_id: author.id })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(location(&resp), "/admin/users");
    assert_eq!(fixture.store.post_count().await, 0);
    assert_eq!(fixture.store.comment_count().await, 0);
}

#[actix_web::test]
async fn test_deleting_unknown_user_reports_error() {
    let fixture = Fixture::new();
    let admin = fixture.user("root", Role::Admin).await;
    let app = init_app!(fixture);

    let req = test::TestRequest::post()
        .uri("/admin/users/delete")
        .cookie(fixture.session(&admin))
        .set_form(DeleteUserForm {
            user_id: Uuid::new_v4(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), "/admin/users");
}

#[actix_web::test]
async fn test_register_then_login_sets_session_cookie() {
    let fixture = Fixture::new();
    let app = init_app!(fixture);

    let req = test::TestRequest::post()
        .uri("/register")
        .set_form(RegisterForm {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "analytical-engine".to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), "/login");

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form(LoginForm {
            username_or_email: "ada@example.com".to_string(),
            password: "analytical-engine".to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(location(&resp), "/");
    let session = resp.response().cookies().find(|c| c.name() == AUTH_COOKIE).unwrap();
    assert!(session.http_only().unwrap_or(false));

    let req = test::TestRequest::get()
        .uri("/")
        .cookie(Cookie::new(AUTH_COOKIE, session.value().to_string()))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["signed_in_as"], "ada");
}

#[actix_web::test]
async fn test_wrong_password_returns_to_login() {
    let fixture = Fixture::new();
    fixture
        .state
        .accounts
        .register(Registration {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "analytical-engine".to_string(),
        })
        .await
        .unwrap();
    let app = init_app!(fixture);

    let req = test::TestRequest::post()
        .uri("/login")
        .set_form(LoginForm {
            username_or_email: "ada".to_string(),
            password: "difference-engine".to_string(),
        })
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(location(&resp), "/login");
    assert!(resp.response().cookies().all(|c| c.name() != AUTH_COOKIE));
}
