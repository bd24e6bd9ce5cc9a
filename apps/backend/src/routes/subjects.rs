//! Subject endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use study_core::clean_name;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/batches/{id}/subjects
/// Seeds the default subjects the first time an empty batch is viewed
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(batch_id): Path<Uuid>,
) -> Result<Json<SubjectListResponse>> {
    let (subjects, seeded) = state
        .db
        .list_or_seed_subjects(auth.user_id, batch_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Batch not found".to_string()))?;

    if seeded {
        tracing::info!("Seeded {} default subjects for batch {}", subjects.len(), batch_id);
    }

    Ok(Json(SubjectListResponse { subjects, seeded }))
}

/// POST /api/batches/{id}/subjects
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(batch_id): Path<Uuid>,
    Json(payload): Json<NameRequest>,
) -> Result<Json<Subject>> {
    let name = clean_name("name", &payload.name)?;
    let subject = state
        .db
        .create_subject(auth.user_id, batch_id, &name)
        .await?
        .ok_or_else(|| ApiError::NotFound("Batch not found".to_string()))?;
    Ok(Json(subject))
}

/// PATCH /api/subjects/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(subject_id): Path<Uuid>,
    Json(payload): Json<NameRequest>,
) -> Result<Json<Subject>> {
    let name = clean_name("name", &payload.name)?;
    let subject = state
        .db
        .rename_subject(auth.user_id, subject_id, &name)
        .await?
        .ok_or_else(|| ApiError::NotFound("Subject not found".to_string()))?;
    Ok(Json(subject))
}

/// DELETE /api/subjects/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(subject_id): Path<Uuid>,
) -> Result<Json<DeletedResponse>> {
    if !state.db.delete_subject(auth.user_id, subject_id).await? {
        return Err(ApiError::NotFound("Subject not found".to_string()));
    }
    Ok(Json(DeletedResponse { deleted: true }))
}
