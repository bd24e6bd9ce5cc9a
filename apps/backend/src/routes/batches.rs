//! Batch endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::Utc;
use study_core::{clamp_percentage, clean_name};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

fn not_found() -> ApiError {
    ApiError::NotFound("Batch not found".to_string())
}

/// GET /api/batches
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<BatchListResponse>> {
    let batches = state.db.list_batches(auth.user_id).await?;
    Ok(Json(BatchListResponse { batches }))
}

/// POST /api/batches
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<CreateBatchRequest>,
) -> Result<Json<Batch>> {
    let batch = NewBatch {
        name: clean_name("name", &payload.name)?,
        date: payload.date.unwrap_or_else(|| Utc::now().date_naive()),
        sources: payload.sources.unwrap_or(1),
        target_percentage: payload.target_percentage.map(clamp_percentage),
    };

    let batch = state.db.create_batch(auth.user_id, &batch).await?;
    tracing::info!("Created batch {} for user {}", batch.id, auth.user_id);

    Ok(Json(batch))
}

/// GET /api/batches/{id}
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(batch_id): Path<Uuid>,
) -> Result<Json<Batch>> {
    let batch = state
        .db
        .get_batch(auth.user_id, batch_id)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(batch))
}

/// PATCH /api/batches/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(batch_id): Path<Uuid>,
    Json(payload): Json<UpdateBatchRequest>,
) -> Result<Json<Batch>> {
    let patch = BatchPatch {
        name: payload
            .name
            .as_deref()
            .map(|n| clean_name("name", n))
            .transpose()?,
        date: payload.date,
        sources: payload.sources,
    };

    let batch = state
        .db
        .update_batch(auth.user_id, batch_id, &patch)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(batch))
}

/// DELETE /api/batches/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(batch_id): Path<Uuid>,
) -> Result<Json<DeletedResponse>> {
    if !state.db.delete_batch(auth.user_id, batch_id).await? {
        return Err(not_found());
    }
    tracing::info!("Deleted batch {} with everything beneath it", batch_id);
    Ok(Json(DeletedResponse { deleted: true }))
}

/// GET /api/batches/{id}/progress
///
/// Completion across the batch's scheduled items, measured against the
/// batch's target percentage.
pub async fn progress(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(batch_id): Path<Uuid>,
) -> Result<Json<BatchProgressResponse>> {
    let batch = state
        .db
        .get_batch(auth.user_id, batch_id)
        .await?
        .ok_or_else(not_found)?;

    let flags = state.db.get_batch_schedule_flags(auth.user_id, batch_id).await?;
    let progress = ProgressSummary::from_flags(flags);
    let current = i32::from(progress.percent);

    let (remaining_to_target, target_reached) = match batch.target_percentage {
        Some(target) => ((target - current).max(0), current >= target),
        None => (0, false),
    };

    Ok(Json(BatchProgressResponse {
        batch_id,
        progress,
        target_percentage: batch.target_percentage,
        remaining_to_target,
        target_reached,
    }))
}
