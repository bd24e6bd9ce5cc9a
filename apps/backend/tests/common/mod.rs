//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext for setting up test environment with database
//! - Helpers that build a user's batch > subject > chapter tree directly
//! - Authentication helpers
//!
//! # Requirements
//! Integration tests require a PostgreSQL database (set DATABASE_URL).

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use axum::Router;
use chrono::{Duration, NaiveDate};
use uuid::Uuid;

use study_tracker_backend::config::Config;
use study_tracker_backend::db::Database;
use study_tracker_backend::models::{Batch, Chapter, DbContentItem, ItemType, NewBatch, Subject};
use study_tracker_backend::services::credentials;
use study_tracker_backend::{build_router, AppState};

/// A batch with one subject and one chapter, owned by a test user.
pub struct Tree {
    pub batch: Batch,
    pub subject: Subject,
    pub chapter: Chapter,
}

/// Test context containing database connection and test router.
///
/// Requires DATABASE_URL environment variable to be set.
pub struct TestContext {
    pub db: Arc<Database>,
    app: Router,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Panics
    /// Panics if DATABASE_URL is not set or database connection fails.
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();

        let database_url =
            std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");

        let db = Database::connect(&database_url, 5)
            .await
            .expect("Failed to connect to test database");

        db.run_migrations()
            .await
            .expect("Failed to run migrations");

        let db = Arc::new(db);

        let config = Config {
            database_url,
            host: "127.0.0.1".to_string(),
            port: 0,
            max_connections: 5,
            session_ttl_days: 1,
        };

        let state = AppState {
            db: db.clone(),
            config: Arc::new(config),
        };

        Self {
            db,
            app: build_router(state),
        }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    /// Create a test user with a live session and return its ID and token.
    pub async fn create_test_user(&self) -> (Uuid, String) {
        let email = format!("student-{}@example.com", Uuid::new_v4().simple());
        let hash = credentials::hash_password("password123").expect("Failed to hash password");

        let user = self
            .db
            .create_user(&email, &hash)
            .await
            .expect("Failed to create test user");
        let session = self
            .db
            .create_session(user.id, Duration::days(1))
            .await
            .expect("Failed to create test session");

        (user.id, session.token)
    }

    /// Format authorization header value.
    pub fn auth_header_value(token: &str) -> String {
        format!("Bearer {}", token)
    }

    pub async fn create_batch(&self, user_id: Uuid, name: &str) -> Batch {
        let batch = NewBatch {
            name: name.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            sources: 1,
            target_percentage: None,
        };
        self.db
            .create_batch(user_id, &batch)
            .await
            .expect("Failed to create batch")
    }

    /// Create batch, subject and chapter in one go.
    pub async fn create_tree(&self, user_id: Uuid) -> Tree {
        let batch = self.create_batch(user_id, "Physics Batch").await;
        let subject = self
            .db
            .create_subject(user_id, batch.id, "Physics")
            .await
            .expect("Failed to create subject")
            .expect("batch should exist");
        let chapter = self
            .db
            .create_chapter(user_id, subject.id, "Kinematics")
            .await
            .expect("Failed to create chapter")
            .expect("subject should exist");

        Tree {
            batch,
            subject,
            chapter,
        }
    }

    /// Insert `count` numbered items of one type directly.
    pub async fn create_items(
        &self,
        user_id: Uuid,
        chapter_id: Uuid,
        item_type: ItemType,
        count: i32,
    ) -> Vec<DbContentItem> {
        let last = self
            .db
            .last_item_number(user_id, chapter_id, item_type)
            .await
            .expect("Failed to read last number");

        let mut items = Vec::new();
        for number in last + 1..=last + count {
            let item = self
                .db
                .insert_content_item(user_id, chapter_id, item_type, "Item", number)
                .await
                .expect("Failed to insert content item");
            items.push(item);
        }
        items
    }

    pub async fn count_rows(&self, table: &str, user_id: Uuid) -> i64 {
        sqlx::query_scalar::<_, i64>(&format!(
            "SELECT COUNT(*) FROM {} WHERE user_id = $1",
            table
        ))
        .bind(user_id)
        .fetch_one(self.db.pool())
        .await
        .expect("Failed to count rows")
    }

    /// Clean up test data for a user.
    ///
    /// Everything the user owns cascades from the users row.
    pub async fn cleanup_user(&self, user_id: Uuid) {
        let _ = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(self.db.pool())
            .await;
    }
}
