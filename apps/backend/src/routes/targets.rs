//! Chapter target endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

/// GET /api/chapters/{id}/targets
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(chapter_id): Path<Uuid>,
) -> Result<Json<TargetListResponse>> {
    state
        .db
        .get_chapter(auth.user_id, chapter_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Chapter not found".to_string()))?;

    let targets = state.db.list_targets(auth.user_id, chapter_id).await?;
    Ok(Json(TargetListResponse {
        targets: targets.iter().map(|t| t.to_api_target()).collect(),
    }))
}

/// POST /api/chapters/{id}/targets
/// The form is validated in full before the database is touched
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(chapter_id): Path<Uuid>,
    Json(form): Json<TargetForm>,
) -> Result<Json<Target>> {
    let valid = form.validate()?;

    let target = state
        .db
        .create_target(auth.user_id, chapter_id, &valid)
        .await?
        .ok_or_else(|| ApiError::NotFound("Chapter not found".to_string()))?;

    tracing::info!("Created target {} in chapter {}", target.id, chapter_id);
    Ok(Json(target.to_api_target()))
}

/// PUT /api/targets/{id}/progress
/// Accepts `{"delta": n}` or `{"absolute": n}`; the stored value is clamped to 0..=100
pub async fn update_progress(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(target_id): Path<Uuid>,
    Json(update): Json<ProgressUpdate>,
) -> Result<Json<Target>> {
    let target = state
        .db
        .update_target_progress(auth.user_id, target_id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound("Target not found".to_string()))?;
    Ok(Json(target.to_api_target()))
}

/// DELETE /api/targets/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(target_id): Path<Uuid>,
) -> Result<Json<DeletedResponse>> {
    if !state.db.delete_target(auth.user_id, target_id).await? {
        return Err(ApiError::NotFound("Target not found".to_string()));
    }
    Ok(Json(DeletedResponse { deleted: true }))
}
