//! Database models and API types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

pub use study_core::{
    Bucket, Cadence, ItemProgress, ItemStatus, ItemType, Overview, ProgressSummary,
    ProgressUpdate, ScheduleSelection, Scheduled, SectionSummary, SelectionStep, TargetCategory,
    TargetForm, ValidationError,
};

// === Database Entity Types ===

/// Registered user
#[derive(Debug, Clone, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub email: String,
    /// Argon2 PHC string
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Bearer-token session
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub token: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

/// Study batch, root of the hierarchy
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Batch {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub date: NaiveDate,
    pub sources: i32,
    pub target_percentage: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Subject {
    pub id: Uuid,
    pub user_id: Uuid,
    pub batch_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Chapter {
    pub id: Uuid,
    pub user_id: Uuid,
    pub subject_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Content item row in PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct DbContentItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub chapter_id: Uuid,
    pub item_type: String,
    pub name: String,
    pub number: i32,
    pub status: String,
    pub revision_count: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Content item as returned by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: Uuid,
    pub chapter_id: Uuid,
    pub item_type: ItemType,
    pub name: String,
    pub number: i32,
    pub status: ItemStatus,
    pub revision_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbContentItem {
    /// Convert to API content item
    pub fn to_api_item(&self) -> ContentItem {
        ContentItem {
            id: self.id,
            chapter_id: self.chapter_id,
            item_type: ItemType::from_str(&self.item_type).unwrap_or_default(),
            name: self.name.clone(),
            number: self.number,
            status: ItemStatus::from_str(&self.status).unwrap_or_default(),
            revision_count: self.revision_count.max(0) as u32,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Chapter target row in PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct DbTarget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub chapter_id: Uuid,
    pub name: String,
    pub category: String,
    pub deadline: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub progress: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    pub id: Uuid,
    pub chapter_id: Uuid,
    pub name: String,
    pub category: TargetCategory,
    pub deadline: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub progress: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbTarget {
    pub fn to_api_target(&self) -> Target {
        Target {
            id: self.id,
            chapter_id: self.chapter_id,
            name: self.name.clone(),
            category: TargetCategory::from_str(&self.category).unwrap_or_default(),
            deadline: self.deadline,
            start_time: self.start_time.clone(),
            end_time: self.end_time.clone(),
            progress: self.progress,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Weekly/monthly task attached to a batch
#[derive(Debug, Clone, FromRow)]
pub struct DbBatchTask {
    pub id: Uuid,
    pub user_id: Uuid,
    pub batch_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub task_type: String,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchTask {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub task_type: Cadence,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

impl DbBatchTask {
    pub fn to_api_task(&self) -> BatchTask {
        BatchTask {
            id: self.id,
            batch_id: self.batch_id,
            title: self.title.clone(),
            description: self.description.clone(),
            task_type: Cadence::from_str(&self.task_type).unwrap_or_default(),
            is_completed: self.is_completed,
            created_at: self.created_at,
        }
    }
}

/// Weekly/monthly percentage goal attached to a batch
#[derive(Debug, Clone, FromRow)]
pub struct DbBatchTarget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub batch_id: Uuid,
    pub target_type: String,
    pub target_value: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchTarget {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub target_type: Cadence,
    pub target_value: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl DbBatchTarget {
    pub fn to_api_target(&self) -> BatchTarget {
        BatchTarget {
            id: self.id,
            batch_id: self.batch_id,
            target_type: Cadence::from_str(&self.target_type).unwrap_or_default(),
            target_value: self.target_value,
            start_date: self.start_date,
            end_date: self.end_date,
            created_at: self.created_at,
        }
    }
}

/// Scheduled item row in PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct DbScheduledItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub batch_id: Uuid,
    pub content_item_id: Uuid,
    pub target_id: Option<Uuid>,
    pub subject_name: String,
    pub chapter_name: String,
    pub item_type: String,
    pub item_name: String,
    pub item_number: i32,
    pub is_completed: bool,
    pub scheduled_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Scheduled item as returned by the API.
///
/// Subject and chapter are stored by name at scheduling time; renaming them
/// later does not rewrite existing entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduledItem {
    pub id: Uuid,
    pub batch_id: Uuid,
    pub content_item_id: Uuid,
    pub target_id: Option<Uuid>,
    pub subject_name: String,
    pub chapter_name: String,
    pub item_type: ItemType,
    pub item_name: String,
    pub item_number: i32,
    pub is_completed: bool,
    pub scheduled_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl DbScheduledItem {
    pub fn to_api_item(&self) -> ScheduledItem {
        ScheduledItem {
            id: self.id,
            batch_id: self.batch_id,
            content_item_id: self.content_item_id,
            target_id: self.target_id,
            subject_name: self.subject_name.clone(),
            chapter_name: self.chapter_name.clone(),
            item_type: ItemType::from_str(&self.item_type).unwrap_or_default(),
            item_name: self.item_name.clone(),
            item_number: self.item_number,
            is_completed: self.is_completed,
            scheduled_date: self.scheduled_date,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl Scheduled for ScheduledItem {
    fn scheduled_date(&self) -> NaiveDate {
        self.scheduled_date
    }

    fn is_completed(&self) -> bool {
        self.is_completed
    }
}

/// Descriptive fields of a content item copied onto a scheduled item
#[derive(Debug, Clone, FromRow)]
pub struct ScheduleSnapshot {
    pub content_item_id: Uuid,
    pub batch_id: Uuid,
    pub subject_name: String,
    pub chapter_name: String,
    pub item_type: String,
    pub item_name: String,
    pub item_number: i32,
}

// === Write Payloads ===

#[derive(Debug, Clone)]
pub struct NewBatch {
    pub name: String,
    pub date: NaiveDate,
    pub sources: i32,
    pub target_percentage: Option<i32>,
}

#[derive(Debug, Clone, Default)]
pub struct BatchPatch {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub sources: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewBatchTask {
    pub title: String,
    pub description: Option<String>,
    pub task_type: Cadence,
}

#[derive(Debug, Clone)]
pub struct NewBatchTarget {
    pub target_type: Cadence,
    pub target_value: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

// === API Request/Response Types ===

// Auth types
#[derive(Debug, Serialize, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user_id: Uuid,
    pub email: String,
}

// Batch types
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateBatchRequest {
    pub name: String,
    pub date: Option<NaiveDate>,
    pub sources: Option<i32>,
    pub target_percentage: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateBatchRequest {
    pub name: Option<String>,
    pub date: Option<NaiveDate>,
    pub sources: Option<i32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchListResponse {
    pub batches: Vec<Batch>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchProgressResponse {
    pub batch_id: Uuid,
    #[serde(flatten)]
    pub progress: ProgressSummary,
    pub target_percentage: Option<i32>,
    pub remaining_to_target: i32,
    pub target_reached: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TargetPercentageRequest {
    pub target_percentage: i32,
}

// Subject / chapter types
#[derive(Debug, Serialize, Deserialize)]
pub struct NameRequest {
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubjectListResponse {
    pub subjects: Vec<Subject>,
    /// True when this request created the default subjects.
    pub seeded: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChapterListResponse {
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChapterProgressResponse {
    pub chapter_id: Uuid,
    pub overall: ProgressSummary,
    pub sections: Vec<SectionSummary>,
}

// Content item types
#[derive(Debug, Serialize, Deserialize)]
pub struct ContentItemQuery {
    pub item_type: Option<String>,
}

impl ContentItemQuery {
    pub fn item_type(&self) -> Result<Option<ItemType>, ValidationError> {
        self.item_type.as_deref().map(ItemType::parse).transpose()
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ContentItemListResponse {
    pub items: Vec<ContentItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BulkCreateResponse {
    pub succeeded: usize,
    pub failed: usize,
    pub items: Vec<ContentItem>,
    pub errors: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetStatusRequest {
    pub status: String,
}

impl SetStatusRequest {
    pub fn status(&self) -> Result<ItemStatus, ValidationError> {
        ItemStatus::parse(self.status.trim())
    }
}

// Target types
#[derive(Debug, Serialize, Deserialize)]
pub struct TargetListResponse {
    pub targets: Vec<Target>,
}

// Batch goal types
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateBatchTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub task_type: Option<String>,
}

impl CreateBatchTaskRequest {
    /// Weekly unless stated otherwise.
    pub fn task_type(&self) -> Result<Cadence, ValidationError> {
        parse_cadence(self.task_type.as_deref())
    }
}

fn parse_cadence(value: Option<&str>) -> Result<Cadence, ValidationError> {
    Ok(value.map(Cadence::parse).transpose()?.unwrap_or_default())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchTaskListResponse {
    pub tasks: Vec<BatchTask>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateBatchTargetRequest {
    pub target_type: Option<String>,
    pub target_value: i32,
    pub start_date: Option<NaiveDate>,
}

impl CreateBatchTargetRequest {
    pub fn target_type(&self) -> Result<Cadence, ValidationError> {
        parse_cadence(self.target_type.as_deref())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchTargetListResponse {
    pub targets: Vec<BatchTarget>,
}

// Schedule types
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ScheduleOptionsQuery {
    pub batch_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub chapter_id: Option<Uuid>,
    pub item_type: Option<String>,
}

impl ScheduleOptionsQuery {
    pub fn item_type(&self) -> Result<Option<ItemType>, ValidationError> {
        self.item_type.as_deref().map(ItemType::parse).transpose()
    }
}

/// Choices for the next level of the scheduling drill-down
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "step", content = "options", rename_all = "snake_case")]
pub enum ScheduleOptions {
    Batch(Vec<Batch>),
    Subject(Vec<Subject>),
    Chapter(Vec<Chapter>),
    ItemType(Vec<ItemType>),
    ContentItems(Vec<ContentItem>),
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub scheduled_date: Option<NaiveDate>,
    pub content_item_ids: Vec<Uuid>,
    pub target_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleFailure {
    pub content_item_id: Uuid,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub succeeded: usize,
    pub failed: usize,
    pub items: Vec<ScheduledItem>,
    pub failures: Vec<ScheduleFailure>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleListQuery {
    pub date: Option<NaiveDate>,
    pub batch_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleListResponse {
    pub items: Vec<ScheduledItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ScheduleOverviewResponse {
    pub today: NaiveDate,
    #[serde(flatten)]
    pub buckets: Overview<ScheduledItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleScheduledResponse {
    pub item: ScheduledItem,
    pub content_status: ItemStatus,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub deleted: bool,
}
