//! Batch-level tasks, percentage goals and the batch target percentage

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use study_core::{
    clamp_percentage, clean_name, clean_optional, week_start, window_end, ValidationError,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

fn batch_not_found() -> ApiError {
    ApiError::NotFound("Batch not found".to_string())
}

async fn ensure_batch(state: &AppState, user_id: Uuid, batch_id: Uuid) -> Result<()> {
    state
        .db
        .get_batch(user_id, batch_id)
        .await?
        .ok_or_else(batch_not_found)?;
    Ok(())
}

// Tasks

/// GET /api/batches/{id}/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(batch_id): Path<Uuid>,
) -> Result<Json<BatchTaskListResponse>> {
    ensure_batch(&state, auth.user_id, batch_id).await?;
    let tasks = state.db.list_batch_tasks(auth.user_id, batch_id).await?;
    Ok(Json(BatchTaskListResponse {
        tasks: tasks.iter().map(|t| t.to_api_task()).collect(),
    }))
}

/// POST /api/batches/{id}/tasks
pub async fn create_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(batch_id): Path<Uuid>,
    Json(payload): Json<CreateBatchTaskRequest>,
) -> Result<Json<BatchTask>> {
    let task = NewBatchTask {
        title: clean_name("title", &payload.title)?,
        description: clean_optional(payload.description.as_deref()),
        task_type: payload.task_type()?,
    };

    let task = state
        .db
        .create_batch_task(auth.user_id, batch_id, &task)
        .await?
        .ok_or_else(batch_not_found)?;
    Ok(Json(task.to_api_task()))
}

/// POST /api/batch-tasks/{id}/toggle
pub async fn toggle_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<BatchTask>> {
    let task = state
        .db
        .toggle_batch_task(auth.user_id, task_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;
    Ok(Json(task.to_api_task()))
}

/// DELETE /api/batch-tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(task_id): Path<Uuid>,
) -> Result<Json<DeletedResponse>> {
    if !state.db.delete_batch_task(auth.user_id, task_id).await? {
        return Err(ApiError::NotFound("Task not found".to_string()));
    }
    Ok(Json(DeletedResponse { deleted: true }))
}

// Percentage goals

/// GET /api/batches/{id}/targets
pub async fn list_targets(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(batch_id): Path<Uuid>,
) -> Result<Json<BatchTargetListResponse>> {
    ensure_batch(&state, auth.user_id, batch_id).await?;
    let targets = state.db.list_batch_targets(auth.user_id, batch_id).await?;
    Ok(Json(BatchTargetListResponse {
        targets: targets.iter().map(|t| t.to_api_target()).collect(),
    }))
}

/// POST /api/batches/{id}/targets
///
/// The window starts on `start_date` (default: the Sunday of the current
/// week) and covers one week or one calendar month.
pub async fn create_target(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(batch_id): Path<Uuid>,
    Json(payload): Json<CreateBatchTargetRequest>,
) -> Result<Json<BatchTarget>> {
    if !(0..=100).contains(&payload.target_value) {
        return Err(ValidationError::TargetValueOutOfRange(payload.target_value).into());
    }
    let target_type = payload.target_type()?;

    let start_date = payload
        .start_date
        .unwrap_or_else(|| week_start(Utc::now().date_naive()));

    let target = NewBatchTarget {
        target_type,
        target_value: payload.target_value,
        start_date,
        end_date: window_end(start_date, target_type),
    };

    let target = state
        .db
        .create_batch_target(auth.user_id, batch_id, &target)
        .await?
        .ok_or_else(batch_not_found)?;
    Ok(Json(target.to_api_target()))
}

/// DELETE /api/batch-targets/{id}
pub async fn delete_target(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(target_id): Path<Uuid>,
) -> Result<Json<DeletedResponse>> {
    if !state.db.delete_batch_target(auth.user_id, target_id).await? {
        return Err(ApiError::NotFound("Batch target not found".to_string()));
    }
    Ok(Json(DeletedResponse { deleted: true }))
}

/// PUT /api/batches/{id}/target-percentage
pub async fn set_target_percentage(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(batch_id): Path<Uuid>,
    Json(payload): Json<TargetPercentageRequest>,
) -> Result<Json<Batch>> {
    let batch = state
        .db
        .set_batch_target_percentage(
            auth.user_id,
            batch_id,
            clamp_percentage(payload.target_percentage),
        )
        .await?
        .ok_or_else(batch_not_found)?;
    Ok(Json(batch))
}
