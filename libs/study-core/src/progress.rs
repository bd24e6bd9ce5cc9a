//! Progress aggregation.
//!
//! All functions are pure reductions over lists that are already in memory;
//! callers recompute on every read.

use serde::{Deserialize, Serialize};

use crate::types::{ItemStatus, ItemType};

/// Completed vs. total counts with the derived percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProgressSummary {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

impl ProgressSummary {
    pub fn new(completed: usize, total: usize) -> Self {
        Self {
            completed,
            total,
            percent: percent(completed, total),
        }
    }

    /// Summarize any sequence of completion flags.
    pub fn from_flags<I>(flags: I) -> Self
    where
        I: IntoIterator<Item = bool>,
    {
        let (completed, total) = flags
            .into_iter()
            .fold((0, 0), |(done, all), flag| (done + usize::from(flag), all + 1));
        Self::new(completed, total)
    }
}

/// Per-section summary for one item type inside a chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionSummary {
    pub item_type: ItemType,
    #[serde(flatten)]
    pub progress: ProgressSummary,
}

/// Percentage of `completed` out of `total`, rounded half up. Zero when empty.
pub fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let completed = completed.min(total) as u64;
    let total = total as u64;
    // floor(100c/t + 1/2) without floating point
    ((200 * completed + total) / (2 * total)) as u8
}

/// Percent of items whose status is `completed`.
pub fn percent_complete<I>(statuses: I) -> u8
where
    I: IntoIterator<Item = ItemStatus>,
{
    ProgressSummary::from_flags(statuses.into_iter().map(|s| s == ItemStatus::Completed)).percent
}

/// One summary per item type, in display order, including empty sections.
pub fn section_summaries<I>(items: I) -> Vec<SectionSummary>
where
    I: IntoIterator<Item = (ItemType, ItemStatus)>,
{
    let mut counts = [(0usize, 0usize); 4];
    for (item_type, status) in items {
        let slot = &mut counts[section_index(item_type)];
        slot.1 += 1;
        if status == ItemStatus::Completed {
            slot.0 += 1;
        }
    }

    ItemType::ALL
        .iter()
        .map(|&item_type| {
            let (completed, total) = counts[section_index(item_type)];
            SectionSummary {
                item_type,
                progress: ProgressSummary::new(completed, total),
            }
        })
        .collect()
}

fn section_index(item_type: ItemType) -> usize {
    match item_type {
        ItemType::Lectures => 0,
        ItemType::Notes => 1,
        ItemType::Dpps => 2,
        ItemType::Homework => 3,
    }
}
