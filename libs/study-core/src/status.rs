//! Content-item status transitions.
//!
//! Every status is reachable from every other status. Entering `revision`
//! always bumps the revision counter, even when the item is already in
//! revision; leaving it never resets the counter.

use serde::{Deserialize, Serialize};

use crate::types::ItemStatus;

/// Status and revision counter of a single content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemProgress {
    pub status: ItemStatus,
    pub revision_count: u32,
}

impl ItemProgress {
    pub fn new(status: ItemStatus, revision_count: u32) -> Self {
        Self {
            status,
            revision_count,
        }
    }

    /// Apply a transition into `to`.
    pub fn transition(self, to: ItemStatus) -> Self {
        Self {
            status: to,
            revision_count: self.revision_count + revision_increment(to),
        }
    }
}

/// Amount added to `revision_count` when an item moves into `to`.
pub fn revision_increment(to: ItemStatus) -> u32 {
    match to {
        ItemStatus::Revision => 1,
        ItemStatus::Completed | ItemStatus::Incomplete => 0,
    }
}

/// Content-item status mirrored from a scheduled item's completion flag.
///
/// Only the completed/incomplete axis is mirrored; a scheduled item can never
/// push its content item into revision.
pub fn mirrored_status(is_completed: bool) -> ItemStatus {
    if is_completed {
        ItemStatus::Completed
    } else {
        ItemStatus::Incomplete
    }
}
