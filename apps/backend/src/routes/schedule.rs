//! Calendar scheduling endpoints

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::routes::auth::AuthenticatedUser;
use crate::services::scheduler;
use crate::AppState;

/// GET /api/schedule/options
/// Choices for the next level of batch > subject > chapter > type > items
pub async fn options(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<ScheduleOptionsQuery>,
) -> Result<Json<ScheduleOptions>> {
    let options = scheduler::next_options(&state.db, auth.user_id, &query).await?;
    Ok(Json(options))
}

/// GET /api/schedule
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Query(query): Query<ScheduleListQuery>,
) -> Result<Json<ScheduleListResponse>> {
    let items = state
        .db
        .list_scheduled_items(auth.user_id, query.date, query.batch_id)
        .await?;
    Ok(Json(ScheduleListResponse {
        items: items.iter().map(|i| i.to_api_item()).collect(),
    }))
}

/// POST /api/schedule
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Json(payload): Json<ScheduleRequest>,
) -> Result<Json<ScheduleResponse>> {
    let today = Utc::now().date_naive();
    let response = scheduler::schedule(&state.db, auth.user_id, &payload, today).await?;
    Ok(Json(response))
}

/// GET /api/schedule/overview
pub async fn overview(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
) -> Result<Json<ScheduleOverviewResponse>> {
    let today = Utc::now().date_naive();
    let items = state.db.list_scheduled_items(auth.user_id, None, None).await?;

    Ok(Json(ScheduleOverviewResponse {
        today,
        buckets: Overview::build(items.iter().map(|i| i.to_api_item()), today),
    }))
}

/// POST /api/schedule/{id}/toggle
pub async fn toggle(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(scheduled_id): Path<Uuid>,
) -> Result<Json<ToggleScheduledResponse>> {
    let response = scheduler::toggle_completion(&state.db, auth.user_id, scheduled_id).await?;
    Ok(Json(response))
}

/// DELETE /api/schedule/{id}
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedUser>,
    Path(scheduled_id): Path<Uuid>,
) -> Result<Json<DeletedResponse>> {
    if !state.db.delete_scheduled_item(auth.user_id, scheduled_id).await? {
        return Err(ApiError::NotFound("Scheduled item not found".to_string()));
    }
    Ok(Json(DeletedResponse { deleted: true }))
}
