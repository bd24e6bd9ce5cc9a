//! Chapter endpoints

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use study_core::{clean_name, section_summaries};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

fn not_found() -> ApiError {
    ApiError::NotFound("Chapter not found".to_string())
}

/// GET /api/subjects/{id}/chapters
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(subject_id): Path<Uuid>,
) -> Result<Json<ChapterListResponse>> {
    if !state.db.subject_exists(auth.user_id, subject_id).await? {
        return Err(ApiError::NotFound("Subject not found".to_string()));
    }
    let chapters = state.db.list_chapters(auth.user_id, subject_id).await?;
    Ok(Json(ChapterListResponse { chapters }))
}

/// POST /api/subjects/{id}/chapters
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(subject_id): Path<Uuid>,
    Json(payload): Json<NameRequest>,
) -> Result<Json<Chapter>> {
    let name = clean_name("name", &payload.name)?;
    let chapter = state
        .db
        .create_chapter(auth.user_id, subject_id, &name)
        .await?
        .ok_or_else(|| ApiError::NotFound("Subject not found".to_string()))?;
    Ok(Json(chapter))
}

/// PATCH /api/chapters/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(chapter_id): Path<Uuid>,
    Json(payload): Json<NameRequest>,
) -> Result<Json<Chapter>> {
    let name = clean_name("name", &payload.name)?;
    let chapter = state
        .db
        .rename_chapter(auth.user_id, chapter_id, &name)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(chapter))
}

/// DELETE /api/chapters/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(chapter_id): Path<Uuid>,
) -> Result<Json<DeletedResponse>> {
    if !state.db.delete_chapter(auth.user_id, chapter_id).await? {
        return Err(not_found());
    }
    Ok(Json(DeletedResponse { deleted: true }))
}

/// GET /api/chapters/{id}/progress
/// Overall ring plus one summary per item type
pub async fn progress(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(chapter_id): Path<Uuid>,
) -> Result<Json<ChapterProgressResponse>> {
    state
        .db
        .get_chapter(auth.user_id, chapter_id)
        .await?
        .ok_or_else(not_found)?;

    let items: Vec<ContentItem> = state
        .db
        .list_content_items(auth.user_id, chapter_id, None)
        .await?
        .iter()
        .map(|i| i.to_api_item())
        .collect();

    let overall =
        ProgressSummary::from_flags(items.iter().map(|i| i.status == ItemStatus::Completed));
    let sections = section_summaries(items.iter().map(|i| (i.item_type, i.status)));

    Ok(Json(ChapterProgressResponse {
        chapter_id,
        overall,
        sections,
    }))
}
