//! Content item endpoints

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use study_core::{clean_name, next_numbers, BulkCreate};
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::AppState;

fn not_found() -> ApiError {
    ApiError::NotFound("Content item not found".to_string())
}

/// GET /api/chapters/{id}/items
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(chapter_id): Path<Uuid>,
    Query(query): Query<ContentItemQuery>,
) -> Result<Json<ContentItemListResponse>> {
    let item_type = query.item_type()?;

    state
        .db
        .get_chapter(auth.user_id, chapter_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Chapter not found".to_string()))?;

    let items = state
        .db
        .list_content_items(auth.user_id, chapter_id, item_type)
        .await?;

    Ok(Json(ContentItemListResponse {
        items: items.iter().map(|i| i.to_api_item()).collect(),
    }))
}

/// POST /api/chapters/{id}/items
///
/// Creates `count` items sharing one name, numbered after the current
/// highest number for that type. Rows are inserted one at a time; the
/// response reports how many landed.
pub async fn create_bulk(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(chapter_id): Path<Uuid>,
    Json(payload): Json<BulkCreate>,
) -> Result<Json<BulkCreateResponse>> {
    let bulk = payload.validate()?;

    state
        .db
        .get_chapter(auth.user_id, chapter_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Chapter not found".to_string()))?;

    let last = state
        .db
        .last_item_number(auth.user_id, chapter_id, bulk.item_type)
        .await?;

    let mut items = Vec::new();
    let mut errors = Vec::new();
    for number in next_numbers(last, bulk.count) {
        match state
            .db
            .insert_content_item(auth.user_id, chapter_id, bulk.item_type, &bulk.name, number)
            .await
        {
            Ok(item) => items.push(item.to_api_item()),
            Err(e) => errors.push(format!("{} {}: {}", bulk.item_type.singular(), number, e)),
        }
    }

    if errors.is_empty() {
        tracing::info!(
            "Created {} {} in chapter {}",
            items.len(),
            bulk.item_type.as_str(),
            chapter_id
        );
    } else {
        tracing::warn!(
            "Bulk create in chapter {}: {} created, {} failed",
            chapter_id,
            items.len(),
            errors.len()
        );
    }

    Ok(Json(BulkCreateResponse {
        succeeded: items.len(),
        failed: errors.len(),
        items,
        errors,
    }))
}

/// PATCH /api/items/{id}
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<NameRequest>,
) -> Result<Json<ContentItem>> {
    let name = clean_name("name", &payload.name)?;
    let item = state
        .db
        .rename_content_item(auth.user_id, item_id, &name)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(item.to_api_item()))
}

/// PUT /api/items/{id}/status
pub async fn set_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(item_id): Path<Uuid>,
    Json(payload): Json<SetStatusRequest>,
) -> Result<Json<ContentItem>> {
    let status = payload.status()?;
    let item = state
        .db
        .set_content_item_status(auth.user_id, item_id, status)
        .await?
        .ok_or_else(not_found)?;
    Ok(Json(item.to_api_item()))
}

/// DELETE /api/items/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(item_id): Path<Uuid>,
) -> Result<Json<DeletedResponse>> {
    if !state.db.delete_content_item(auth.user_id, item_id).await? {
        return Err(not_found());
    }
    Ok(Json(DeletedResponse { deleted: true }))
}
