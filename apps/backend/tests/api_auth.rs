//! Sign-up, sign-in and session API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL environment variable before running.

mod common;

use axum::http::{header::AUTHORIZATION, StatusCode};
use axum_test::TestServer;
use uuid::Uuid;

use common::fixtures;
use common::TestContext;

fn user_id_of(body: &serde_json::Value) -> Uuid {
    Uuid::parse_str(body["user_id"].as_str().unwrap()).unwrap()
}

/// Test sign-up returns a usable session.
#[tokio::test]
#[ignore = "requires database"]
async fn test_sign_up_then_me() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let email = fixtures::unique_email();

    let response = server
        .post("/api/auth/sign-up")
        .json(&fixtures::credentials(&email, "secret-pass"))
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    let user_id = user_id_of(&body);
    let token = body["token"].as_str().unwrap().to_string();

    let me = server
        .get("/api/auth/me")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;

    me.assert_status_ok();
    let me: serde_json::Value = me.json();
    assert_eq!(me["email"], email);

    ctx.cleanup_user(user_id).await;
}

/// Test duplicate e-mail is a conflict.
#[tokio::test]
#[ignore = "requires database"]
async fn test_sign_up_duplicate_email() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let email = fixtures::unique_email();

    let first = server
        .post("/api/auth/sign-up")
        .json(&fixtures::credentials(&email, "secret-pass"))
        .await;
    first.assert_status_ok();
    let user_id = user_id_of(&first.json());

    let second = server
        .post("/api/auth/sign-up")
        .json(&fixtures::credentials(&email.to_uppercase(), "other-pass"))
        .await;
    second.assert_status(StatusCode::CONFLICT);

    ctx.cleanup_user(user_id).await;
}

/// Test short password is rejected with field errors.
#[tokio::test]
#[ignore = "requires database"]
async fn test_sign_up_short_password() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    let response = server
        .post("/api/auth/sign-up")
        .json(&fixtures::credentials(&fixtures::unique_email(), "123"))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["fields"][0]["field"], "password");
}

/// Test sign-in with correct and wrong passwords.
#[tokio::test]
#[ignore = "requires database"]
async fn test_sign_in() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let email = fixtures::unique_email();

    let sign_up = server
        .post("/api/auth/sign-up")
        .json(&fixtures::credentials(&email, "secret-pass"))
        .await;
    let user_id = user_id_of(&sign_up.json());

    let wrong = server
        .post("/api/auth/sign-in")
        .json(&fixtures::credentials(&email, "not-the-pass"))
        .await;
    wrong.assert_status(StatusCode::UNAUTHORIZED);

    let right = server
        .post("/api/auth/sign-in")
        .json(&fixtures::credentials(&email, "secret-pass"))
        .await;
    right.assert_status_ok();
    assert_eq!(user_id_of(&right.json()), user_id);

    ctx.cleanup_user(user_id).await;
}

/// Test sign-out invalidates the token.
#[tokio::test]
#[ignore = "requires database"]
async fn test_sign_out_revokes_session() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;

    let response = server
        .post("/api/auth/sign-out")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;
    response.assert_status_ok();

    let after = server
        .get("/api/batches")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .await;
    after.assert_status(StatusCode::UNAUTHORIZED);

    ctx.cleanup_user(user_id).await;
}

/// Test protected routes need a bearer token.
#[tokio::test]
#[ignore = "requires database"]
async fn test_requires_auth() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();

    server.get("/api/batches").await.assert_status(StatusCode::UNAUTHORIZED);

    // Missing "Bearer " prefix
    server
        .get("/api/batches")
        .add_header(AUTHORIZATION, "some-token")
        .await
        .assert_status(StatusCode::UNAUTHORIZED);
}

/// Test signing in clears the user's expired sessions.
#[tokio::test]
#[ignore = "requires database"]
async fn test_sign_in_removes_expired_sessions() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let email = fixtures::unique_email();

    let response = server
        .post("/api/auth/sign-up")
        .json(&fixtures::credentials(&email, "secret-pass"))
        .await;
    response.assert_status_ok();
    let user_id = user_id_of(&response.json());

    sqlx::query(
        "INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, NOW() - INTERVAL '1 day')",
    )
    .bind(format!("stale-{}", Uuid::new_v4().simple()))
    .bind(user_id)
    .execute(ctx.db.pool())
    .await
    .expect("Failed to insert expired session");

    server
        .post("/api/auth/sign-in")
        .json(&fixtures::credentials(&email, "secret-pass"))
        .await
        .assert_status_ok();

    let expired = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM sessions WHERE user_id = $1 AND expires_at <= NOW()",
    )
    .bind(user_id)
    .fetch_one(ctx.db.pool())
    .await
    .expect("Failed to count sessions");
    assert_eq!(expired, 0);
    assert_eq!(ctx.count_rows("sessions", user_id).await, 2);

    ctx.cleanup_user(user_id).await;
}
