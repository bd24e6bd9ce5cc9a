//! Chapter targets: create-form validation and progress updates.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::types::TargetCategory;

/// Shortest accepted target name.
pub const MIN_NAME_LEN: usize = 3;

/// Step used by the +/- buttons on a target card.
pub const PROGRESS_STEP: i32 = 10;

pub const MAX_PROGRESS: i32 = 100;

/// Requested change to a target's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressUpdate {
    /// Relative change, usually +/-10.
    Delta(i32),
    /// Absolute value, e.g. 50/75/100.
    Absolute(i32),
}

impl ProgressUpdate {
    /// One step up.
    pub fn increase() -> Self {
        Self::Delta(PROGRESS_STEP)
    }

    /// One step down.
    pub fn decrease() -> Self {
        Self::Delta(-PROGRESS_STEP)
    }

    /// Resulting progress, always within [0, 100].
    pub fn apply(self, current: i32) -> i32 {
        let raw = match self {
            Self::Delta(delta) => i64::from(current) + i64::from(delta),
            Self::Absolute(value) => i64::from(value),
        };
        raw.clamp(0, i64::from(MAX_PROGRESS)) as i32
    }
}

/// Clamp an arbitrary percentage into [0, 100].
pub fn clamp_percentage(value: i32) -> i32 {
    value.clamp(0, MAX_PROGRESS)
}

/// Raw target form as submitted by the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetForm {
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub deadline: Option<NaiveDate>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

/// A target form that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTarget {
    pub name: String,
    pub category: TargetCategory,
    pub deadline: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl TargetForm {
    /// Validate every field, collecting all failures.
    pub fn validate(&self) -> Result<ValidTarget> {
        let mut errors = Vec::new();

        let name = self.name.trim();
        if name.chars().count() < MIN_NAME_LEN {
            errors.push(ValidationError::NameTooShort {
                field: "name",
                min: MIN_NAME_LEN,
            });
        }

        let category = TargetCategory::parse(&self.category);
        if let Err(e) = &category {
            errors.push(e.clone());
        }

        let start_time = check_time("start_time", self.start_time.as_deref());
        if let Err(e) = &start_time {
            errors.push(e.clone());
        }
        let end_time = check_time("end_time", self.end_time.as_deref());
        if let Err(e) = &end_time {
            errors.push(e.clone());
        }

        match (category, start_time, end_time) {
            (Ok(category), Ok(start_time), Ok(end_time)) if errors.is_empty() => Ok(ValidTarget {
                name: name.to_string(),
                category,
                deadline: self.deadline,
                start_time,
                end_time,
            }),
            _ if errors.len() == 1 => Err(errors.remove(0)),
            _ => Err(ValidationError::Fields(errors)),
        }
    }
}

/// Accept an optional "HH:MM" value; blank counts as absent.
fn check_time(field: &'static str, value: Option<&str>) -> Result<Option<String>> {
    let value = match value.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(v) => v,
    };

    let well_formed = value.len() == 5 && NaiveTime::parse_from_str(value, "%H:%M").is_ok();
    if !well_formed {
        return Err(ValidationError::InvalidTime {
            field,
            value: value.to_string(),
        });
    }
    Ok(Some(value.to_string()))
}
