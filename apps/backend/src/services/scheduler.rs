//! Scheduling content items onto the calendar.
//!
//! Bulk scheduling inserts one row per item and keeps going past failures.
//! Completion toggles are mirrored onto the content item.

use chrono::NaiveDate;
use study_core::{ScheduleSelection, SelectionStep, ValidationError};
use uuid::Uuid;

use crate::db::Database;
use crate::error::{ApiError, Result};
use crate::models::*;

/// Options for the next unanswered step of the drill-down.
///
/// Choosing a level without its parent is rejected, mirroring how picking a
/// new value upstream clears everything below it. A pick that does not sit
/// under its parent is reported as not found.
pub async fn next_options(
    db: &Database,
    user_id: Uuid,
    query: &ScheduleOptionsQuery,
) -> Result<ScheduleOptions> {
    let selection = selection_from_query(query)?;
    ensure_lineage(db, user_id, &selection).await?;

    let options = match selection.next_step() {
        SelectionStep::Batch => ScheduleOptions::Batch(db.list_batches(user_id).await?),
        SelectionStep::Subject => {
            let batch_id = require(selection.batch_id, "batch")?;
            ScheduleOptions::Subject(db.list_subjects(user_id, batch_id).await?)
        }
        SelectionStep::Chapter => {
            let subject_id = require(selection.subject_id, "subject")?;
            ScheduleOptions::Chapter(db.list_chapters(user_id, subject_id).await?)
        }
        SelectionStep::ItemType => ScheduleOptions::ItemType(ItemType::ALL.to_vec()),
        SelectionStep::ContentItems => {
            let chapter_id = require(selection.chapter_id, "chapter")?;
            let items = db
                .list_content_items(user_id, chapter_id, selection.item_type)
                .await?;
            ScheduleOptions::ContentItems(items.iter().map(|i| i.to_api_item()).collect())
        }
    };

    Ok(options)
}

async fn ensure_lineage(db: &Database, user_id: Uuid, selection: &ScheduleSelection) -> Result<()> {
    if let Some(batch_id) = selection.batch_id {
        db.get_batch(user_id, batch_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Batch not found".to_string()))?;

        if let Some(subject_id) = selection.subject_id {
            if !db.subject_in_batch(user_id, batch_id, subject_id).await? {
                return Err(ApiError::NotFound("Subject not found in batch".to_string()));
            }

            if let Some(chapter_id) = selection.chapter_id {
                db.get_chapter(user_id, chapter_id)
                    .await?
                    .filter(|chapter| chapter.subject_id == subject_id)
                    .ok_or_else(|| ApiError::NotFound("Chapter not found in subject".to_string()))?;
            }
        }
    }
    Ok(())
}

fn selection_from_query(query: &ScheduleOptionsQuery) -> Result<ScheduleSelection> {
    let mut selection = ScheduleSelection::default();
    if let Some(batch_id) = query.batch_id {
        selection.select_batch(batch_id);
    }
    if let Some(subject_id) = query.subject_id {
        selection.select_subject(subject_id)?;
    }
    if let Some(chapter_id) = query.chapter_id {
        selection.select_chapter(chapter_id)?;
    }
    if let Some(item_type) = query.item_type()? {
        selection.select_item_type(item_type)?;
    }
    Ok(selection)
}

fn require(id: Option<Uuid>, level: &'static str) -> Result<Uuid> {
    id.ok_or(ApiError::Validation(ValidationError::MissingSelection(level)))
}

/// Create one scheduled item per content item.
///
/// Each insert stands alone; failures are counted and reported next to the
/// rows that made it.
pub async fn schedule(
    db: &Database,
    user_id: Uuid,
    request: &ScheduleRequest,
    today: NaiveDate,
) -> Result<ScheduleResponse> {
    if request.content_item_ids.is_empty() {
        return Err(ValidationError::NothingSelected.into());
    }

    if let Some(target_id) = request.target_id {
        db.get_target(user_id, target_id)
            .await?
            .ok_or_else(|| ApiError::NotFound("Target not found".to_string()))?;
    }

    let scheduled_date = request.scheduled_date.unwrap_or(today);
    let mut items = Vec::new();
    let mut failures = Vec::new();

    for &content_item_id in &request.content_item_ids {
        match schedule_one(db, user_id, content_item_id, scheduled_date, request.target_id).await {
            Ok(item) => items.push(item.to_api_item()),
            Err(e) => failures.push(ScheduleFailure {
                content_item_id,
                message: e.to_string(),
            }),
        }
    }

    if failures.is_empty() {
        tracing::info!("Scheduled {} items for {}", items.len(), scheduled_date);
    } else {
        tracing::warn!(
            "Scheduled {} items for {}, {} failed",
            items.len(),
            scheduled_date,
            failures.len()
        );
    }

    Ok(ScheduleResponse {
        succeeded: items.len(),
        failed: failures.len(),
        items,
        failures,
    })
}

async fn schedule_one(
    db: &Database,
    user_id: Uuid,
    content_item_id: Uuid,
    scheduled_date: NaiveDate,
    target_id: Option<Uuid>,
) -> Result<DbScheduledItem> {
    let snapshot = db
        .get_schedule_snapshot(user_id, content_item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Content item not found".to_string()))?;

    db.insert_scheduled_item(user_id, &snapshot, scheduled_date, target_id)
        .await
}

/// Flip completion and mirror it onto the content item
pub async fn toggle_completion(
    db: &Database,
    user_id: Uuid,
    scheduled_id: Uuid,
) -> Result<ToggleScheduledResponse> {
    let outcome = db
        .toggle_scheduled_item(user_id, scheduled_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Scheduled item not found".to_string()))?;

    if !outcome.mirrored {
        tracing::warn!(
            "Scheduled item {} toggled but content item {} was not updated",
            outcome.item.id,
            outcome.item.content_item_id
        );
        return Err(ApiError::ConsistencyGap(format!(
            "content item {} no longer matches scheduled item {}",
            outcome.item.content_item_id, outcome.item.id
        )));
    }

    Ok(ToggleScheduledResponse {
        item: outcome.item.to_api_item(),
        content_status: outcome.content_status,
    })
}
