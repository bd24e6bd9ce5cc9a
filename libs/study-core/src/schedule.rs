//! Calendar scheduling helpers.
//!
//! `ScheduleSelection` tracks the batch -> subject -> chapter -> item type
//! drill-down that ends in a list of content items to pick from. Choosing a
//! value at any level clears everything below it, so option lists are always
//! fetched against the current parent.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, ValidationError};
use crate::types::ItemType;

/// Level of the drill-down that still needs a choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionStep {
    Batch,
    Subject,
    Chapter,
    ItemType,
    ContentItems,
}

/// Current picks of the scheduling drill-down.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleSelection {
    pub batch_id: Option<Uuid>,
    pub subject_id: Option<Uuid>,
    pub chapter_id: Option<Uuid>,
    pub item_type: Option<ItemType>,
}

impl ScheduleSelection {
    pub fn select_batch(&mut self, batch_id: Uuid) {
        self.batch_id = Some(batch_id);
        self.subject_id = None;
        self.clear_below_subject();
    }

    pub fn select_subject(&mut self, subject_id: Uuid) -> Result<()> {
        if self.batch_id.is_none() {
            return Err(ValidationError::MissingSelection("batch"));
        }
        self.subject_id = Some(subject_id);
        self.clear_below_subject();
        Ok(())
    }

    pub fn select_chapter(&mut self, chapter_id: Uuid) -> Result<()> {
        if self.subject_id.is_none() {
            return Err(ValidationError::MissingSelection("subject"));
        }
        self.chapter_id = Some(chapter_id);
        self.item_type = None;
        Ok(())
    }

    pub fn select_item_type(&mut self, item_type: ItemType) -> Result<()> {
        if self.chapter_id.is_none() {
            return Err(ValidationError::MissingSelection("chapter"));
        }
        self.item_type = Some(item_type);
        Ok(())
    }

    /// First level without a choice.
    pub fn next_step(&self) -> SelectionStep {
        if self.batch_id.is_none() {
            SelectionStep::Batch
        } else if self.subject_id.is_none() {
            SelectionStep::Subject
        } else if self.chapter_id.is_none() {
            SelectionStep::Chapter
        } else if self.item_type.is_none() {
            SelectionStep::ItemType
        } else {
            SelectionStep::ContentItems
        }
    }

    fn clear_below_subject(&mut self) {
        self.chapter_id = None;
        self.item_type = None;
    }
}

/// Anything placed on the calendar.
pub trait Scheduled {
    fn scheduled_date(&self) -> NaiveDate;
    fn is_completed(&self) -> bool;
}

/// Calendar bucket relative to a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Bucket {
    Overdue,
    Today,
    Upcoming,
}

/// Bucket for one entry. Finished entries from past days belong nowhere.
pub fn classify(scheduled_date: NaiveDate, is_completed: bool, today: NaiveDate) -> Option<Bucket> {
    if scheduled_date == today {
        Some(Bucket::Today)
    } else if scheduled_date > today {
        Some(Bucket::Upcoming)
    } else if !is_completed {
        Some(Bucket::Overdue)
    } else {
        None
    }
}

/// Scheduled entries grouped into calendar buckets, input order preserved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Overview<T> {
    pub overdue: Vec<T>,
    pub today: Vec<T>,
    pub upcoming: Vec<T>,
}

impl<T: Scheduled> Overview<T> {
    pub fn build<I>(items: I, today: NaiveDate) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut overview = Self {
            overdue: Vec::new(),
            today: Vec::new(),
            upcoming: Vec::new(),
        };

        for item in items {
            match classify(item.scheduled_date(), item.is_completed(), today) {
                Some(Bucket::Overdue) => overview.overdue.push(item),
                Some(Bucket::Today) => overview.today.push(item),
                Some(Bucket::Upcoming) => overview.upcoming.push(item),
                None => {}
            }
        }

        overview
    }
}
