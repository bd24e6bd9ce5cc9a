//! PostgreSQL database operations
//!
//! Every query is scoped by `user_id`. Rows owned by another user behave
//! exactly like rows that do not exist.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use study_core::{mirrored_status, revision_increment, ProgressUpdate, ValidTarget, DEFAULT_SUBJECTS};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

/// Result of flipping a scheduled item's completion flag.
#[derive(Debug, Clone)]
pub struct ToggleOutcome {
    pub item: DbScheduledItem,
    pub content_status: ItemStatus,
    /// False when the linked content item could not be updated.
    pub mirrored: bool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // === User Repository ===

    pub async fn create_user(&self, email: &str, password_hash: &str) -> Result<DbUser> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            INSERT INTO users (email, password_hash)
            VALUES ($1, $2)
            RETURNING id, email, password_hash, created_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<DbUser>> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<DbUser>> {
        let user = sqlx::query_as::<_, DbUser>(
            r#"
            SELECT id, email, password_hash, created_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    // === Session Repository ===

    /// Create a session with a freshly generated token
    pub async fn create_session(&self, user_id: Uuid, ttl: Duration) -> Result<Session> {
        let token = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        let expires_at: DateTime<Utc> = Utc::now() + ttl;

        let session = sqlx::query_as::<_, Session>(
            r#"
            INSERT INTO sessions (token, user_id, expires_at)
            VALUES ($1, $2, $3)
            RETURNING token, user_id, created_at, expires_at
            "#,
        )
        .bind(&token)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(session)
    }

    /// Get an unexpired session by token
    pub async fn get_session(&self, token: &str) -> Result<Option<Session>> {
        let session = sqlx::query_as::<_, Session>(
            r#"
            SELECT token, user_id, created_at, expires_at
            FROM sessions
            WHERE token = $1 AND expires_at > NOW()
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    pub async fn delete_session(&self, token: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Drop the user's sessions that have run past their expiry
    pub async fn delete_expired_sessions(&self, user_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE user_id = $1 AND expires_at <= NOW()")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    // === Batch Repository ===

    /// List batches, newest first
    pub async fn list_batches(&self, user_id: Uuid) -> Result<Vec<Batch>> {
        let batches = sqlx::query_as::<_, Batch>(
            r#"
            SELECT id, user_id, name, date, sources, target_percentage, created_at, updated_at
            FROM batches
            WHERE user_id = $1
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(batches)
    }

    pub async fn get_batch(&self, user_id: Uuid, batch_id: Uuid) -> Result<Option<Batch>> {
        let batch = sqlx::query_as::<_, Batch>(
            r#"
            SELECT id, user_id, name, date, sources, target_percentage, created_at, updated_at
            FROM batches
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(batch_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(batch)
    }

    pub async fn create_batch(&self, user_id: Uuid, batch: &NewBatch) -> Result<Batch> {
        let batch = sqlx::query_as::<_, Batch>(
            r#"
            INSERT INTO batches (user_id, name, date, sources, target_percentage)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, name, date, sources, target_percentage, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(&batch.name)
        .bind(batch.date)
        .bind(batch.sources)
        .bind(batch.target_percentage)
        .fetch_one(&self.pool)
        .await?;

        Ok(batch)
    }

    /// Apply a partial update; absent fields keep their stored value
    pub async fn update_batch(
        &self,
        user_id: Uuid,
        batch_id: Uuid,
        patch: &BatchPatch,
    ) -> Result<Option<Batch>> {
        let batch = sqlx::query_as::<_, Batch>(
            r#"
            UPDATE batches
            SET name = COALESCE($3, name),
                date = COALESCE($4, date),
                sources = COALESCE($5, sources),
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, date, sources, target_percentage, created_at, updated_at
            "#,
        )
        .bind(batch_id)
        .bind(user_id)
        .bind(patch.name.as_deref())
        .bind(patch.date)
        .bind(patch.sources)
        .fetch_optional(&self.pool)
        .await?;

        Ok(batch)
    }

    pub async fn set_batch_target_percentage(
        &self,
        user_id: Uuid,
        batch_id: Uuid,
        target_percentage: i32,
    ) -> Result<Option<Batch>> {
        let batch = sqlx::query_as::<_, Batch>(
            r#"
            UPDATE batches
            SET target_percentage = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, name, date, sources, target_percentage, created_at, updated_at
            "#,
        )
        .bind(batch_id)
        .bind(user_id)
        .bind(target_percentage)
        .fetch_optional(&self.pool)
        .await?;

        Ok(batch)
    }

    /// Delete a batch; children go with it through the foreign keys
    pub async fn delete_batch(&self, user_id: Uuid, batch_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM batches WHERE id = $1 AND user_id = $2")
            .bind(batch_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Completion flags of every scheduled item in a batch
    pub async fn get_batch_schedule_flags(&self, user_id: Uuid, batch_id: Uuid) -> Result<Vec<bool>> {
        let flags = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT is_completed
            FROM scheduled_items
            WHERE batch_id = $1 AND user_id = $2
            "#,
        )
        .bind(batch_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(flags)
    }

    // === Subject Repository ===

    pub async fn list_subjects(&self, user_id: Uuid, batch_id: Uuid) -> Result<Vec<Subject>> {
        let subjects = sqlx::query_as::<_, Subject>(
            r#"
            SELECT id, user_id, batch_id, name, created_at, updated_at
            FROM subjects
            WHERE batch_id = $1 AND user_id = $2
            ORDER BY created_at, id
            "#,
        )
        .bind(batch_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(subjects)
    }

    /// List a batch's subjects, creating the default set when it has none.
    ///
    /// The batch row is locked for the duration so two concurrent first
    /// views cannot both seed. Returns `None` if the batch does not exist,
    /// otherwise the subjects and whether seeding happened.
    pub async fn list_or_seed_subjects(
        &self,
        user_id: Uuid,
        batch_id: Uuid,
    ) -> Result<Option<(Vec<Subject>, bool)>> {
        let mut tx = self.pool.begin().await?;

        let locked = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM batches WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(batch_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        if locked.is_none() {
            return Ok(None);
        }

        let existing = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM subjects WHERE batch_id = $1 AND user_id = $2",
        )
        .bind(batch_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let seeded = existing == 0;
        if seeded {
            for name in DEFAULT_SUBJECTS {
                // clock_timestamp keeps the defaults in insertion order
                sqlx::query(
                    r#"
                    INSERT INTO subjects (user_id, batch_id, name, created_at, updated_at)
                    VALUES ($1, $2, $3, clock_timestamp(), clock_timestamp())
                    "#,
                )
                .bind(user_id)
                .bind(batch_id)
                .bind(name)
                .execute(&mut *tx)
                .await?;
            }
        }

        let subjects = sqlx::query_as::<_, Subject>(
            r#"
            SELECT id, user_id, batch_id, name, created_at, updated_at
            FROM subjects
            WHERE batch_id = $1 AND user_id = $2
            ORDER BY created_at, id
            "#,
        )
        .bind(batch_id)
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some((subjects, seeded)))
    }

    /// Create a subject; `None` if the batch is not the user's
    pub async fn create_subject(
        &self,
        user_id: Uuid,
        batch_id: Uuid,
        name: &str,
    ) -> Result<Option<Subject>> {
        let subject = sqlx::query_as::<_, Subject>(
            r#"
            INSERT INTO subjects (user_id, batch_id, name)
            SELECT $1, $2, $3
            WHERE EXISTS (SELECT 1 FROM batches WHERE id = $2 AND user_id = $1)
            RETURNING id, user_id, batch_id, name, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(batch_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subject)
    }

    pub async fn rename_subject(
        &self,
        user_id: Uuid,
        subject_id: Uuid,
        name: &str,
    ) -> Result<Option<Subject>> {
        let subject = sqlx::query_as::<_, Subject>(
            r#"
            UPDATE subjects
            SET name = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, batch_id, name, created_at, updated_at
            "#,
        )
        .bind(subject_id)
        .bind(user_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(subject)
    }

    pub async fn delete_subject(&self, user_id: Uuid, subject_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM subjects WHERE id = $1 AND user_id = $2")
            .bind(subject_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // === Chapter Repository ===

    pub async fn list_chapters(&self, user_id: Uuid, subject_id: Uuid) -> Result<Vec<Chapter>> {
        let chapters = sqlx::query_as::<_, Chapter>(
            r#"
            SELECT id, user_id, subject_id, name, created_at, updated_at
            FROM chapters
            WHERE subject_id = $1 AND user_id = $2
            ORDER BY created_at, id
            "#,
        )
        .bind(subject_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(chapters)
    }

    pub async fn get_chapter(&self, user_id: Uuid, chapter_id: Uuid) -> Result<Option<Chapter>> {
        let chapter = sqlx::query_as::<_, Chapter>(
            r#"
            SELECT id, user_id, subject_id, name, created_at, updated_at
            FROM chapters
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(chapter_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(chapter)
    }

    pub async fn subject_exists(&self, user_id: Uuid, subject_id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM subjects WHERE id = $1 AND user_id = $2)",
        )
        .bind(subject_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Whether the subject is the user's and sits under the batch
    pub async fn subject_in_batch(
        &self,
        user_id: Uuid,
        batch_id: Uuid,
        subject_id: Uuid,
    ) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM subjects WHERE id = $1 AND batch_id = $2 AND user_id = $3)",
        )
        .bind(subject_id)
        .bind(batch_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Create a chapter; `None` if the subject is not the user's
    pub async fn create_chapter(
        &self,
        user_id: Uuid,
        subject_id: Uuid,
        name: &str,
    ) -> Result<Option<Chapter>> {
        let chapter = sqlx::query_as::<_, Chapter>(
            r#"
            INSERT INTO chapters (user_id, subject_id, name)
            SELECT $1, $2, $3
            WHERE EXISTS (SELECT 1 FROM subjects WHERE id = $2 AND user_id = $1)
            RETURNING id, user_id, subject_id, name, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(subject_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(chapter)
    }

    pub async fn rename_chapter(
        &self,
        user_id: Uuid,
        chapter_id: Uuid,
        name: &str,
    ) -> Result<Option<Chapter>> {
        let chapter = sqlx::query_as::<_, Chapter>(
            r#"
            UPDATE chapters
            SET name = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, subject_id, name, created_at, updated_at
            "#,
        )
        .bind(chapter_id)
        .bind(user_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(chapter)
    }

    pub async fn delete_chapter(&self, user_id: Uuid, chapter_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM chapters WHERE id = $1 AND user_id = $2")
            .bind(chapter_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // === Content Item Repository ===

    /// List a chapter's items by number, optionally of a single type
    pub async fn list_content_items(
        &self,
        user_id: Uuid,
        chapter_id: Uuid,
        item_type: Option<ItemType>,
    ) -> Result<Vec<DbContentItem>> {
        let items = sqlx::query_as::<_, DbContentItem>(
            r#"
            SELECT id, user_id, chapter_id, item_type, name, number, status,
                   revision_count, created_at, updated_at
            FROM content_items
            WHERE chapter_id = $1 AND user_id = $2
              AND ($3::text IS NULL OR item_type = $3)
            ORDER BY number, created_at
            "#,
        )
        .bind(chapter_id)
        .bind(user_id)
        .bind(item_type.map(|t| t.as_str()))
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn get_content_item(&self, user_id: Uuid, item_id: Uuid) -> Result<Option<DbContentItem>> {
        let item = sqlx::query_as::<_, DbContentItem>(
            r#"
            SELECT id, user_id, chapter_id, item_type, name, number, status,
                   revision_count, created_at, updated_at
            FROM content_items
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(item_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Highest number used in a chapter for one item type, 0 if none
    pub async fn last_item_number(
        &self,
        user_id: Uuid,
        chapter_id: Uuid,
        item_type: ItemType,
    ) -> Result<i32> {
        let last = sqlx::query_scalar::<_, Option<i32>>(
            r#"
            SELECT MAX(number)
            FROM content_items
            WHERE chapter_id = $1 AND user_id = $2 AND item_type = $3
            "#,
        )
        .bind(chapter_id)
        .bind(user_id)
        .bind(item_type.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(last.unwrap_or(0))
    }

    /// Insert one incomplete item with the given number
    pub async fn insert_content_item(
        &self,
        user_id: Uuid,
        chapter_id: Uuid,
        item_type: ItemType,
        name: &str,
        number: i32,
    ) -> Result<DbContentItem> {
        let item = sqlx::query_as::<_, DbContentItem>(
            r#"
            INSERT INTO content_items (user_id, chapter_id, item_type, name, number)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, chapter_id, item_type, name, number, status,
                      revision_count, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(chapter_id)
        .bind(item_type.as_str())
        .bind(name)
        .bind(number)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn rename_content_item(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        name: &str,
    ) -> Result<Option<DbContentItem>> {
        let item = sqlx::query_as::<_, DbContentItem>(
            r#"
            UPDATE content_items
            SET name = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, chapter_id, item_type, name, number, status,
                      revision_count, created_at, updated_at
            "#,
        )
        .bind(item_id)
        .bind(user_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    /// Move an item to a new status.
    ///
    /// The revision counter is bumped in the same statement, so concurrent
    /// transitions into revision each count once.
    pub async fn set_content_item_status(
        &self,
        user_id: Uuid,
        item_id: Uuid,
        status: ItemStatus,
    ) -> Result<Option<DbContentItem>> {
        let increment = revision_increment(status) as i32;

        let item = sqlx::query_as::<_, DbContentItem>(
            r#"
            UPDATE content_items
            SET status = $3,
                revision_count = revision_count + $4,
                updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, chapter_id, item_type, name, number, status,
                      revision_count, created_at, updated_at
            "#,
        )
        .bind(item_id)
        .bind(user_id)
        .bind(status.as_str())
        .bind(increment)
        .fetch_optional(&self.pool)
        .await?;

        Ok(item)
    }

    pub async fn delete_content_item(&self, user_id: Uuid, item_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM content_items WHERE id = $1 AND user_id = $2")
            .bind(item_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // === Target Repository ===

    pub async fn list_targets(&self, user_id: Uuid, chapter_id: Uuid) -> Result<Vec<DbTarget>> {
        let targets = sqlx::query_as::<_, DbTarget>(
            r#"
            SELECT id, user_id, chapter_id, name, category, deadline, start_time, end_time,
                   progress, created_at, updated_at
            FROM targets
            WHERE chapter_id = $1 AND user_id = $2
            ORDER BY created_at, id
            "#,
        )
        .bind(chapter_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(targets)
    }

    pub async fn get_target(&self, user_id: Uuid, target_id: Uuid) -> Result<Option<DbTarget>> {
        let target = sqlx::query_as::<_, DbTarget>(
            r#"
            SELECT id, user_id, chapter_id, name, category, deadline, start_time, end_time,
                   progress, created_at, updated_at
            FROM targets
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(target_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(target)
    }

    /// Create a target at 0% progress; `None` if the chapter is not the user's
    pub async fn create_target(
        &self,
        user_id: Uuid,
        chapter_id: Uuid,
        target: &ValidTarget,
    ) -> Result<Option<DbTarget>> {
        let target = sqlx::query_as::<_, DbTarget>(
            r#"
            INSERT INTO targets (user_id, chapter_id, name, category, deadline, start_time, end_time)
            SELECT $1, $2, $3, $4, $5, $6, $7
            WHERE EXISTS (SELECT 1 FROM chapters WHERE id = $2 AND user_id = $1)
            RETURNING id, user_id, chapter_id, name, category, deadline, start_time, end_time,
                      progress, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(chapter_id)
        .bind(&target.name)
        .bind(target.category.as_str())
        .bind(target.deadline)
        .bind(target.start_time.as_deref())
        .bind(target.end_time.as_deref())
        .fetch_optional(&self.pool)
        .await?;

        Ok(target)
    }

    /// Apply a progress change under a row lock so deltas never get lost
    pub async fn update_target_progress(
        &self,
        user_id: Uuid,
        target_id: Uuid,
        update: ProgressUpdate,
    ) -> Result<Option<DbTarget>> {
        let mut tx = self.pool.begin().await?;

        let current = sqlx::query_scalar::<_, i32>(
            "SELECT progress FROM targets WHERE id = $1 AND user_id = $2 FOR UPDATE",
        )
        .bind(target_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(current) = current else {
            return Ok(None);
        };

        let target = sqlx::query_as::<_, DbTarget>(
            r#"
            UPDATE targets
            SET progress = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, chapter_id, name, category, deadline, start_time, end_time,
                      progress, created_at, updated_at
            "#,
        )
        .bind(target_id)
        .bind(user_id)
        .bind(update.apply(current))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(target))
    }

    pub async fn delete_target(&self, user_id: Uuid, target_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM targets WHERE id = $1 AND user_id = $2")
            .bind(target_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // === Batch Task Repository ===

    /// List a batch's tasks, newest first
    pub async fn list_batch_tasks(&self, user_id: Uuid, batch_id: Uuid) -> Result<Vec<DbBatchTask>> {
        let tasks = sqlx::query_as::<_, DbBatchTask>(
            r#"
            SELECT id, user_id, batch_id, title, description, task_type, is_completed,
                   created_at, updated_at
            FROM batch_tasks
            WHERE batch_id = $1 AND user_id = $2
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(batch_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(tasks)
    }

    pub async fn create_batch_task(
        &self,
        user_id: Uuid,
        batch_id: Uuid,
        task: &NewBatchTask,
    ) -> Result<Option<DbBatchTask>> {
        let task = sqlx::query_as::<_, DbBatchTask>(
            r#"
            INSERT INTO batch_tasks (user_id, batch_id, title, description, task_type)
            SELECT $1, $2, $3, $4, $5
            WHERE EXISTS (SELECT 1 FROM batches WHERE id = $2 AND user_id = $1)
            RETURNING id, user_id, batch_id, title, description, task_type, is_completed,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(batch_id)
        .bind(&task.title)
        .bind(task.description.as_deref())
        .bind(task.task_type.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn toggle_batch_task(&self, user_id: Uuid, task_id: Uuid) -> Result<Option<DbBatchTask>> {
        let task = sqlx::query_as::<_, DbBatchTask>(
            r#"
            UPDATE batch_tasks
            SET is_completed = NOT is_completed, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, batch_id, title, description, task_type, is_completed,
                      created_at, updated_at
            "#,
        )
        .bind(task_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(task)
    }

    pub async fn delete_batch_task(&self, user_id: Uuid, task_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM batch_tasks WHERE id = $1 AND user_id = $2")
            .bind(task_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // === Batch Target Repository ===

    pub async fn list_batch_targets(&self, user_id: Uuid, batch_id: Uuid) -> Result<Vec<DbBatchTarget>> {
        let targets = sqlx::query_as::<_, DbBatchTarget>(
            r#"
            SELECT id, user_id, batch_id, target_type, target_value, start_date, end_date,
                   created_at, updated_at
            FROM batch_targets
            WHERE batch_id = $1 AND user_id = $2
            ORDER BY created_at DESC, id
            "#,
        )
        .bind(batch_id)
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(targets)
    }

    pub async fn create_batch_target(
        &self,
        user_id: Uuid,
        batch_id: Uuid,
        target: &NewBatchTarget,
    ) -> Result<Option<DbBatchTarget>> {
        let target = sqlx::query_as::<_, DbBatchTarget>(
            r#"
            INSERT INTO batch_targets (user_id, batch_id, target_type, target_value, start_date, end_date)
            SELECT $1, $2, $3, $4, $5, $6
            WHERE EXISTS (SELECT 1 FROM batches WHERE id = $2 AND user_id = $1)
            RETURNING id, user_id, batch_id, target_type, target_value, start_date, end_date,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(batch_id)
        .bind(target.target_type.as_str())
        .bind(target.target_value)
        .bind(target.start_date)
        .bind(target.end_date)
        .fetch_optional(&self.pool)
        .await?;

        Ok(target)
    }

    pub async fn delete_batch_target(&self, user_id: Uuid, target_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM batch_targets WHERE id = $1 AND user_id = $2")
            .bind(target_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    // === Scheduled Item Repository ===

    /// List scheduled items by date, optionally for one day and/or batch
    pub async fn list_scheduled_items(
        &self,
        user_id: Uuid,
        date: Option<NaiveDate>,
        batch_id: Option<Uuid>,
    ) -> Result<Vec<DbScheduledItem>> {
        let items = sqlx::query_as::<_, DbScheduledItem>(
            r#"
            SELECT id, user_id, batch_id, content_item_id, target_id, subject_name, chapter_name,
                   item_type, item_name, item_number, is_completed, scheduled_date,
                   created_at, updated_at
            FROM scheduled_items
            WHERE user_id = $1
              AND ($2::date IS NULL OR scheduled_date = $2)
              AND ($3::uuid IS NULL OR batch_id = $3)
            ORDER BY scheduled_date, created_at
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(batch_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Current descriptive fields of a content item and its ancestors
    pub async fn get_schedule_snapshot(
        &self,
        user_id: Uuid,
        content_item_id: Uuid,
    ) -> Result<Option<ScheduleSnapshot>> {
        let snapshot = sqlx::query_as::<_, ScheduleSnapshot>(
            r#"
            SELECT ci.id AS content_item_id,
                   s.batch_id,
                   s.name AS subject_name,
                   c.name AS chapter_name,
                   ci.item_type,
                   ci.name AS item_name,
                   ci.number AS item_number
            FROM content_items ci
            JOIN chapters c ON c.id = ci.chapter_id
            JOIN subjects s ON s.id = c.subject_id
            WHERE ci.id = $1 AND ci.user_id = $2
            "#,
        )
        .bind(content_item_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(snapshot)
    }

    pub async fn insert_scheduled_item(
        &self,
        user_id: Uuid,
        snapshot: &ScheduleSnapshot,
        scheduled_date: NaiveDate,
        target_id: Option<Uuid>,
    ) -> Result<DbScheduledItem> {
        let item = sqlx::query_as::<_, DbScheduledItem>(
            r#"
            INSERT INTO scheduled_items (
                user_id, batch_id, content_item_id, target_id, subject_name, chapter_name,
                item_type, item_name, item_number, scheduled_date
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING id, user_id, batch_id, content_item_id, target_id, subject_name, chapter_name,
                      item_type, item_name, item_number, is_completed, scheduled_date,
                      created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(snapshot.batch_id)
        .bind(snapshot.content_item_id)
        .bind(target_id)
        .bind(&snapshot.subject_name)
        .bind(&snapshot.chapter_name)
        .bind(&snapshot.item_type)
        .bind(&snapshot.item_name)
        .bind(snapshot.item_number)
        .bind(scheduled_date)
        .fetch_one(&self.pool)
        .await?;

        Ok(item)
    }

    /// Flip a scheduled item's completion and mirror it onto its content item.
    ///
    /// Both writes share one transaction: a database error on either rolls
    /// back the flip. If the mirror matches no row the flip is still
    /// committed and `mirrored` is false.
    pub async fn toggle_scheduled_item(
        &self,
        user_id: Uuid,
        scheduled_id: Uuid,
    ) -> Result<Option<ToggleOutcome>> {
        let mut tx = self.pool.begin().await?;

        let item = sqlx::query_as::<_, DbScheduledItem>(
            r#"
            UPDATE scheduled_items
            SET is_completed = NOT is_completed, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            RETURNING id, user_id, batch_id, content_item_id, target_id, subject_name, chapter_name,
                      item_type, item_name, item_number, is_completed, scheduled_date,
                      created_at, updated_at
            "#,
        )
        .bind(scheduled_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(item) = item else {
            return Ok(None);
        };

        let content_status = mirrored_status(item.is_completed);
        let mirrored = sqlx::query(
            r#"
            UPDATE content_items
            SET status = $3, updated_at = NOW()
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(item.content_item_id)
        .bind(user_id)
        .bind(content_status.as_str())
        .execute(&mut *tx)
        .await?
        .rows_affected()
            > 0;

        tx.commit().await?;

        Ok(Some(ToggleOutcome {
            item,
            content_status,
            mirrored,
        }))
    }

    pub async fn delete_scheduled_item(&self, user_id: Uuid, scheduled_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM scheduled_items WHERE id = $1 AND user_id = $2")
            .bind(scheduled_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
