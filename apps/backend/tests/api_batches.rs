//! Batch, subject and chapter registry API tests.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL environment variable before running.

mod common;

use axum::http::{header::AUTHORIZATION, StatusCode};
use axum_test::TestServer;
use pretty_assertions::assert_eq;

use common::fixtures;
use common::TestContext;
use study_tracker_backend::models::ItemType;

/// Test create, list, rename and delete of a batch.
#[tokio::test]
#[ignore = "requires database"]
async fn test_batch_crud() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let auth = TestContext::auth_header_value(&token);

    let created = server
        .post("/api/batches")
        .add_header(AUTHORIZATION, auth.clone())
        .json(&fixtures::batch_request("  JEE 2026  "))
        .await;
    created.assert_status_ok();
    let batch: serde_json::Value = created.json();
    assert_eq!(batch["name"], "JEE 2026");
    assert_eq!(batch["sources"], 2);
    let batch_id = batch["id"].as_str().unwrap().to_string();

    let renamed = server
        .patch(&format!("/api/batches/{}", batch_id))
        .add_header(AUTHORIZATION, auth.clone())
        .json(&serde_json::json!({ "name": "NEET 2026" }))
        .await;
    renamed.assert_status_ok();
    let renamed: serde_json::Value = renamed.json();
    assert_eq!(renamed["name"], "NEET 2026");
    assert_eq!(renamed["sources"], 2);

    let list = server
        .get("/api/batches")
        .add_header(AUTHORIZATION, auth.clone())
        .await;
    let list: serde_json::Value = list.json();
    assert_eq!(list["batches"].as_array().unwrap().len(), 1);

    server
        .delete(&format!("/api/batches/{}", batch_id))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status_ok();

    server
        .get(&format!("/api/batches/{}", batch_id))
        .add_header(AUTHORIZATION, auth)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    ctx.cleanup_user(user_id).await;
}

/// Test an empty batch name is rejected.
#[tokio::test]
#[ignore = "requires database"]
async fn test_batch_requires_name() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;

    server
        .post("/api/batches")
        .add_header(AUTHORIZATION, TestContext::auth_header_value(&token))
        .json(&fixtures::batch_request("   "))
        .await
        .assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(ctx.count_rows("batches", user_id).await, 0);
    ctx.cleanup_user(user_id).await;
}

/// Test batches of another user are invisible.
#[tokio::test]
#[ignore = "requires database"]
async fn test_batches_are_user_scoped() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (owner_id, _) = ctx.create_test_user().await;
    let (other_id, other_token) = ctx.create_test_user().await;
    let batch = ctx.create_batch(owner_id, "Private").await;

    let auth = TestContext::auth_header_value(&other_token);
    server
        .get(&format!("/api/batches/{}", batch.id))
        .add_header(AUTHORIZATION, auth.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);
    server
        .delete(&format!("/api/batches/{}", batch.id))
        .add_header(AUTHORIZATION, auth)
        .await
        .assert_status(StatusCode::NOT_FOUND);

    assert_eq!(ctx.count_rows("batches", owner_id).await, 1);

    ctx.cleanup_user(owner_id).await;
    ctx.cleanup_user(other_id).await;
}

/// Test default subjects are seeded on first view only.
#[tokio::test]
#[ignore = "requires database"]
async fn test_subjects_seeded_once() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let auth = TestContext::auth_header_value(&token);
    let batch = ctx.create_batch(user_id, "Physics Batch").await;
    let url = format!("/api/batches/{}/subjects", batch.id);

    let first = server.get(&url).add_header(AUTHORIZATION, auth.clone()).await;
    first.assert_status_ok();
    let first: serde_json::Value = first.json();
    assert_eq!(first["seeded"], true);
    let names: Vec<&str> = first["subjects"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Physics", "Chemistry", "Maths", "Biology"]);

    // Delete three, leaving one
    for subject in first["subjects"].as_array().unwrap().iter().skip(1) {
        server
            .delete(&format!("/api/subjects/{}", subject["id"].as_str().unwrap()))
            .add_header(AUTHORIZATION, auth.clone())
            .await
            .assert_status_ok();
    }

    let second = server.get(&url).add_header(AUTHORIZATION, auth).await;
    let second: serde_json::Value = second.json();
    assert_eq!(second["seeded"], false);
    assert_eq!(second["subjects"].as_array().unwrap().len(), 1);
    assert_eq!(second["subjects"][0]["name"], "Physics");

    ctx.cleanup_user(user_id).await;
}

/// Test a batch that already has a subject is never seeded.
#[tokio::test]
#[ignore = "requires database"]
async fn test_no_seed_when_subject_exists() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let auth = TestContext::auth_header_value(&token);
    let batch = ctx.create_batch(user_id, "Custom").await;

    server
        .post(&format!("/api/batches/{}/subjects", batch.id))
        .add_header(AUTHORIZATION, auth.clone())
        .json(&serde_json::json!({ "name": "Astronomy" }))
        .await
        .assert_status_ok();

    let list = server
        .get(&format!("/api/batches/{}/subjects", batch.id))
        .add_header(AUTHORIZATION, auth)
        .await;
    let list: serde_json::Value = list.json();
    assert_eq!(list["seeded"], false);
    assert_eq!(list["subjects"].as_array().unwrap().len(), 1);

    ctx.cleanup_user(user_id).await;
}

/// Test chapters are listed in creation order and can be renamed.
#[tokio::test]
#[ignore = "requires database"]
async fn test_chapter_crud() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let auth = TestContext::auth_header_value(&token);
    let tree = ctx.create_tree(user_id).await;
    let url = format!("/api/subjects/{}/chapters", tree.subject.id);

    let created = server
        .post(&url)
        .add_header(AUTHORIZATION, auth.clone())
        .json(&serde_json::json!({ "name": "Optics" }))
        .await;
    created.assert_status_ok();
    let optics: serde_json::Value = created.json();

    let renamed = server
        .patch(&format!("/api/chapters/{}", optics["id"].as_str().unwrap()))
        .add_header(AUTHORIZATION, auth.clone())
        .json(&serde_json::json!({ "name": "Ray Optics" }))
        .await;
    renamed.assert_status_ok();

    let list = server.get(&url).add_header(AUTHORIZATION, auth).await;
    let list: serde_json::Value = list.json();
    let names: Vec<&str> = list["chapters"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Kinematics", "Ray Optics"]);

    ctx.cleanup_user(user_id).await;
}

/// Test deleting a batch removes its whole tree.
#[tokio::test]
#[ignore = "requires database"]
async fn test_delete_batch_cascades() {
    let ctx = TestContext::new().await;
    let server = TestServer::new(ctx.router()).unwrap();
    let (user_id, token) = ctx.create_test_user().await;
    let auth = TestContext::auth_header_value(&token);
    let tree = ctx.create_tree(user_id).await;
    let items = ctx
        .create_items(user_id, tree.chapter.id, ItemType::Lectures, 3)
        .await;

    server
        .post(&format!("/api/chapters/{}/targets", tree.chapter.id))
        .add_header(AUTHORIZATION, auth.clone())
        .json(&fixtures::target_form("Finish lectures", "primary"))
        .await
        .assert_status_ok();
    server
        .post("/api/schedule")
        .add_header(AUTHORIZATION, auth.clone())
        .json(&fixtures::schedule_request("2025-02-01", &[items[0].id]))
        .await
        .assert_status_ok();

    server
        .delete(&format!("/api/batches/{}", tree.batch.id))
        .add_header(AUTHORIZATION, auth)
        .await
        .assert_status_ok();

    for table in [
        "subjects",
        "chapters",
        "content_items",
        "targets",
        "scheduled_items",
    ] {
        assert_eq!(ctx.count_rows(table, user_id).await, 0, "{} not emptied", table);
    }

    ctx.cleanup_user(user_id).await;
}
