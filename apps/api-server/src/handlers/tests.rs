use std::sync::Arc;

use actix_web::http::header::{
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_REQUEST_METHOD, AUTHORIZATION, ORIGIN,
};
use actix_web::http::{Method, StatusCode};
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use serde_json::{Value, json};
use uuid::Uuid;

use quill_core::ports::{PasswordService, TokenService};
use quill_infra::{Argon2PasswordService, JwtConfig, JwtTokenService};

use super::configure_routes;
use crate::middleware::cors::cors;
use crate::state::AppState;

const PASSWORD: &str = "correct-horse";

fn jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "handler-test-secret".to_string(),
        expiration_hours: 1,
        issuer: "quill-test".to_string(),
    }
}

fn token_service() -> Arc<dyn TokenService> {
    Arc::new(JwtTokenService::new(jwt_config()))
}

fn password_service() -> Arc<dyn PasswordService> {
    Arc::new(Argon2PasswordService::with_cost(8, 1).unwrap())
}

fn bearer(token: &str) -> (actix_web::http::header::HeaderName, String) {
    (AUTHORIZATION, format!("Bearer {token}"))
}

macro_rules! test_app {
    () => {
        test_app!(&[])
    };
    ($origins:expr) => {
        test::init_service(
            App::new()
                .wrap(cors($origins))
                .app_data(web::Data::new(AppState::in_memory()))
                .app_data(web::Data::new(token_service()))
                .app_data(web::Data::new(password_service()))
                .configure(configure_routes),
        )
        .await
    };
}

/// Send a request and decode the JSON body (`Null` when empty).
macro_rules! send {
    ($app:expr, $req:expr) => {{
        let resp = test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let bytes = test::read_body(resp).await;
        let body: Value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }};
}

/// Register `email` and return `(token, user_id)`.
macro_rules! signup {
    ($app:expr, $email:expr) => {{
        let (status, body) = send!(
            $app,
            TestRequest::post()
                .uri("/api/auth/signup")
                .set_json(json!({ "email": $email, "password": PASSWORD }))
        );
        assert_eq!(status, StatusCode::CREATED, "signup failed: {body}");
        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
        )
    }};
}

/// Create a post as `token` and return its id.
macro_rules! create_post {
    ($app:expr, $token:expr) => {{
        let (status, body) = send!(
            $app,
            TestRequest::post()
                .uri("/api/posts")
                .insert_header(bearer(&$token))
                .set_json(json!({ "title": "Hello", "content": "First post" }))
        );
        assert_eq!(status, StatusCode::CREATED, "create post failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }};
}

#[actix_web::test]
async fn signup_returns_token_and_user() {
    let app = test_app!();

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(json!({ "email": "writer@quill.dev", "password": PASSWORD }))
    );

    assert_eq!(status, StatusCode::CREATED);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["email"], "writer@quill.dev");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("password_hash").is_none());
}

#[actix_web::test]
async fn signup_twice_is_bad_request() {
    let app = test_app!();
    signup!(app, "dup@quill.dev");

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(json!({ "email": "dup@quill.dev", "password": PASSWORD }))
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "User already exists" }));
}

#[actix_web::test]
async fn signup_rejects_invalid_input() {
    let app = test_app!();

    let (bad_email, _) = send!(
        app,
        TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(json!({ "email": "nope", "password": PASSWORD }))
    );
    let (short_password, _) = send!(
        app,
        TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(json!({ "email": "ok@quill.dev", "password": "short" }))
    );
    let (missing_field, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/auth/signup")
            .set_json(json!({ "email": "ok@quill.dev" }))
    );

    assert_eq!(bad_email, StatusCode::BAD_REQUEST);
    assert_eq!(short_password, StatusCode::BAD_REQUEST);
    assert_eq!(missing_field, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn login_failures_are_indistinguishable() {
    let app = test_app!();
    let (_, user_id) = signup!(app, "reader@quill.dev");

    let (ok_status, ok_body) = send!(
        app,
        TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "reader@quill.dev", "password": PASSWORD }))
    );
    let (wrong_pw_status, wrong_pw_body) = send!(
        app,
        TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "reader@quill.dev", "password": "not-the-password" }))
    );
    let (unknown_status, unknown_body) = send!(
        app,
        TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "ghost@quill.dev", "password": PASSWORD }))
    );

    assert_eq!(ok_status, StatusCode::OK);
    assert_eq!(ok_body["user"]["id"], user_id.as_str());
    assert_eq!(wrong_pw_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw_body, json!({ "error": "Invalid credentials" }));
    assert_eq!(wrong_pw_body, unknown_body);
}

#[actix_web::test]
async fn protected_route_requires_token() {
    let app = test_app!();

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/posts")
            .set_json(json!({ "title": "t", "content": "c" }))
    );

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "No token provided" }));
}

#[actix_web::test]
async fn bare_bearer_header_counts_as_missing_token() {
    let app = test_app!();

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/posts")
            .insert_header((AUTHORIZATION, "Bearer"))
            .set_json(json!({ "title": "t", "content": "c" }))
    );

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "No token provided" }));
}

#[actix_web::test]
async fn expired_token_is_rejected() {
    let app = test_app!();
    let (_, user_id) = signup!(app, "late@quill.dev");
    let expired = JwtTokenService::new(JwtConfig {
        expiration_hours: -2,
        ..jwt_config()
    })
    .generate_token(Uuid::parse_str(&user_id).unwrap(), "late@quill.dev")
    .unwrap();

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&expired))
            .set_json(json!({ "title": "t", "content": "c" }))
    );

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({ "error": "Invalid token" }));
}

#[actix_web::test]
async fn forged_token_is_rejected() {
    let app = test_app!();
    let forged = JwtTokenService::new(JwtConfig {
        secret: "someone-elses-secret".to_string(),
        ..jwt_config()
    })
    .generate_token(Uuid::new_v4(), "mallory@quill.dev")
    .unwrap();

    let (status, _) = send!(
        app,
        TestRequest::post()
            .uri(&format!("/api/posts/{}/like", Uuid::new_v4()))
            .insert_header(bearer(&forged))
    );

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn post_lifecycle() {
    let app = test_app!();
    let (token, user_id) = signup!(app, "author@quill.dev");
    let post_id = create_post!(app, token);

    let (status, post) = send!(app, TestRequest::get().uri(&format!("/api/posts/{post_id}")));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(post["title"], "Hello");
    assert_eq!(post["authorId"], user_id.as_str());
    assert_eq!(post["author"]["email"], "author@quill.dev");
    assert_eq!(post["_count"], json!({ "likes": 0, "comments": 0 }));

    let (status, updated) = send!(
        app,
        TestRequest::put()
            .uri(&format!("/api/posts/{post_id}"))
            .insert_header(bearer(&token))
            .set_json(json!({ "title": "Hello again", "content": "Edited" }))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Hello again");
    assert_eq!(updated["content"], "Edited");

    let (status, body) = send!(
        app,
        TestRequest::delete()
            .uri(&format!("/api/posts/{post_id}"))
            .insert_header(bearer(&token))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Post deleted" }));

    let (status, body) = send!(app, TestRequest::get().uri(&format!("/api/posts/{post_id}")));
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Post not found" }));
}

#[actix_web::test]
async fn create_post_validates_input() {
    let app = test_app!();
    let (token, _) = signup!(app, "author@quill.dev");

    let (status, body) = send!(
        app,
        TestRequest::post()
            .uri("/api/posts")
            .insert_header(bearer(&token))
            .set_json(json!({ "title": "  ", "content": "Body" }))
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Title is required" }));
}

#[actix_web::test]
async fn missing_post_is_not_found() {
    let app = test_app!();
    let (token, _) = signup!(app, "author@quill.dev");
    let missing = Uuid::new_v4();

    let (update, _) = send!(
        app,
        TestRequest::put()
            .uri(&format!("/api/posts/{missing}"))
            .insert_header(bearer(&token))
            .set_json(json!({ "title": "t", "content": "c" }))
    );
    let (delete, _) = send!(
        app,
        TestRequest::delete()
            .uri(&format!("/api/posts/{missing}"))
            .insert_header(bearer(&token))
    );
    let (like, _) = send!(
        app,
        TestRequest::post()
            .uri(&format!("/api/posts/{missing}/like"))
            .insert_header(bearer(&token))
    );
    let (comment, _) = send!(
        app,
        TestRequest::post()
            .uri(&format!("/api/posts/{missing}/comments"))
            .insert_header(bearer(&token))
            .set_json(json!({ "content": "hi" }))
    );
    let (bad_id, body) = send!(app, TestRequest::get().uri("/api/posts/not-a-uuid"));

    assert_eq!(update, StatusCode::NOT_FOUND);
    assert_eq!(delete, StatusCode::NOT_FOUND);
    assert_eq!(like, StatusCode::NOT_FOUND);
    assert_eq!(comment, StatusCode::NOT_FOUND);
    assert_eq!(bad_id, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[actix_web::test]
async fn like_toggle_twice_restores_state() {
    let app = test_app!();
    let (author, _) = signup!(app, "author@quill.dev");
    let (fan, _) = signup!(app, "fan@quill.dev");
    let post_id = create_post!(app, author);
    let like_uri = format!("/api/posts/{post_id}/like");

    let (status, first) = send!(
        app,
        TestRequest::post().uri(&like_uri).insert_header(bearer(&fan))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        first,
        json!({ "message": "Post liked", "likesCount": 1, "userLiked": true })
    );

    let (_, feed) = send!(
        app,
        TestRequest::get().uri("/api/posts").insert_header(bearer(&fan))
    );
    assert_eq!(feed[0]["userLiked"], true);
    assert_eq!(feed[0]["_count"]["likes"], 1);
    assert_eq!(feed[0]["likes"][0]["user"]["email"], "fan@quill.dev");

    let (_, anonymous_feed) = send!(app, TestRequest::get().uri("/api/posts"));
    assert_eq!(anonymous_feed[0]["userLiked"], false);

    let (status, second) = send!(
        app,
        TestRequest::post().uri(&like_uri).insert_header(bearer(&fan))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        second,
        json!({ "message": "Post unliked", "likesCount": 0, "userLiked": false })
    );
}

#[actix_web::test]
async fn comments_flow_and_ownership() {
    let app = test_app!();
    let (author, _) = signup!(app, "author@quill.dev");
    let (stranger, _) = signup!(app, "stranger@quill.dev");
    let post_id = create_post!(app, author);
    let comments_uri = format!("/api/posts/{post_id}/comments");

    let (status, created) = send!(
        app,
        TestRequest::post()
            .uri(&comments_uri)
            .insert_header(bearer(&author))
            .set_json(json!({ "content": "Thanks for reading" }))
    );
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["content"], "Thanks for reading");
    assert_eq!(created["user"]["email"], "author@quill.dev");
    let comment_id = created["id"].as_str().unwrap().to_string();

    let (status, listed) = send!(app, TestRequest::get().uri(&comments_uri));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        listed,
        json!([{
            "id": comment_id,
            "content": "Thanks for reading",
            "authorEmail": "author@quill.dev"
        }])
    );

    let delete_uri = format!("{comments_uri}/{comment_id}");
    let (status, body) = send!(
        app,
        TestRequest::delete()
            .uri(&delete_uri)
            .insert_header(bearer(&stranger))
    );
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Comment not found or unauthorized" }));

    let (status, body) = send!(
        app,
        TestRequest::delete()
            .uri(&delete_uri)
            .insert_header(bearer(&author))
    );
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Comment deleted" }));

    let (_, listed) = send!(app, TestRequest::get().uri(&comments_uri));
    assert_eq!(listed, json!([]));
}

#[actix_web::test]
async fn empty_comment_is_rejected() {
    let app = test_app!();
    let (token, _) = signup!(app, "author@quill.dev");
    let post_id = create_post!(app, token);

    let (status, _) = send!(
        app,
        TestRequest::post()
            .uri(&format!("/api/posts/{post_id}/comments"))
            .insert_header(bearer(&token))
            .set_json(json!({ "content": "" }))
    );

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn deleting_post_removes_its_comments() {
    let app = test_app!();
    let (token, _) = signup!(app, "author@quill.dev");
    let post_id = create_post!(app, token);
    let comments_uri = format!("/api/posts/{post_id}/comments");
    send!(
        app,
        TestRequest::post()
            .uri(&comments_uri)
            .insert_header(bearer(&token))
            .set_json(json!({ "content": "soon gone" }))
    );

    send!(
        app,
        TestRequest::delete()
            .uri(&format!("/api/posts/{post_id}"))
            .insert_header(bearer(&token))
    );

    let (status, listed) = send!(app, TestRequest::get().uri(&comments_uri));
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed, json!([]));
}

#[actix_web::test]
async fn health_reports_storage() {
    let app = test_app!();

    let (status, body) = send!(app, TestRequest::get().uri("/api/health"));

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "in-memory");
}

#[actix_web::test]
async fn preflight_allows_any_origin_by_default() {
    let app = test_app!();

    let resp = test::call_service(
        &app,
        TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/api/posts")
            .insert_header((ORIGIN, "http://localhost:3000"))
            .insert_header((ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .to_request(),
    )
    .await;

    assert!(resp.status().is_success());
    assert_eq!(
        resp.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "*"
    );
}

#[actix_web::test]
async fn preflight_respects_configured_origins() {
    let origins = vec!["https://quill.dev".to_string()];
    let app = test_app!(&origins);

    let allowed = test::call_service(
        &app,
        TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/api/posts")
            .insert_header((ORIGIN, "https://quill.dev"))
            .insert_header((ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .to_request(),
    )
    .await;
    let denied = test::call_service(
        &app,
        TestRequest::default()
            .method(Method::OPTIONS)
            .uri("/api/posts")
            .insert_header((ORIGIN, "https://evil.example"))
            .insert_header((ACCESS_CONTROL_REQUEST_METHOD, "POST"))
            .to_request(),
    )
    .await;

    assert!(allowed.status().is_success());
    assert_eq!(
        allowed.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(),
        "https://quill.dev"
    );
    assert!(denied.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
}
