//! Core study-tracking library shared by the backend and its tests.
//!
//! Provides:
//! - Closed enums for content items, targets and batch cadences
//! - The content-item status state machine (revision counting)
//! - Progress aggregation over content items and scheduled items
//! - Target progress clamping and create-form validation
//! - The step-wise selection used when scheduling items onto the calendar

pub mod cadence;
pub mod content;
pub mod error;
pub mod progress;
pub mod schedule;
pub mod status;
pub mod target;
pub mod types;

pub use cadence::{week_start, window_end};
pub use content::{last_number, next_numbers, BulkCreate, ValidBulk, MAX_BULK_COUNT};
pub use error::{Result, ValidationError};
pub use progress::{percent, percent_complete, section_summaries, ProgressSummary, SectionSummary};
pub use schedule::{classify, Bucket, Overview, ScheduleSelection, Scheduled, SelectionStep};
pub use status::{mirrored_status, revision_increment, ItemProgress};
pub use target::{clamp_percentage, ProgressUpdate, TargetForm, ValidTarget};
pub use types::{
    clean_name, clean_optional, Cadence, ItemStatus, ItemType, TargetCategory, DEFAULT_SUBJECTS,
};
