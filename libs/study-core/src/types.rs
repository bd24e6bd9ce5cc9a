//! Core types for the study tracker.

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Subjects created for a batch the first time its subject list is empty.
pub const DEFAULT_SUBJECTS: [&str; 4] = ["Physics", "Chemistry", "Maths", "Biology"];

/// Kind of study material inside a chapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Lectures,
    Notes,
    Dpps,
    Homework,
}

impl Default for ItemType {
    fn default() -> Self {
        Self::Lectures
    }
}

impl ItemType {
    /// Every item type, in the order chapter sections are shown.
    pub const ALL: [ItemType; 4] = [Self::Lectures, Self::Notes, Self::Dpps, Self::Homework];

    /// Get the column value as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Lectures => "lectures",
            Self::Notes => "notes",
            Self::Dpps => "dpps",
            Self::Homework => "homework",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "lectures" => Some(Self::Lectures),
            "notes" => Some(Self::Notes),
            "dpps" => Some(Self::Dpps),
            "homework" => Some(Self::Homework),
            _ => None,
        }
    }

    /// Parse, reporting unknown values as a validation error.
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| ValidationError::UnknownItemType(s.to_string()))
    }

    /// Singular label, e.g. "lecture" for a scheduled entry.
    pub fn singular(&self) -> &'static str {
        match self {
            Self::Lectures => "lecture",
            Self::Notes => "note",
            Self::Dpps => "dpp",
            Self::Homework => "homework",
        }
    }
}

/// Completion status of a content item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    Incomplete,
    Completed,
    Revision,
}

impl Default for ItemStatus {
    fn default() -> Self {
        Self::Incomplete
    }
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Incomplete => "incomplete",
            Self::Completed => "completed",
            Self::Revision => "revision",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "incomplete" => Some(Self::Incomplete),
            "completed" => Some(Self::Completed),
            "revision" => Some(Self::Revision),
            _ => None,
        }
    }

    /// Parse, reporting unknown values as a validation error.
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| ValidationError::UnknownStatus(s.to_string()))
    }
}

/// Audience level of a chapter target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetCategory {
    Preprimary,
    Primary,
    Secondary,
    HigherSecondary,
}

impl Default for TargetCategory {
    fn default() -> Self {
        Self::Primary
    }
}

impl TargetCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preprimary => "preprimary",
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::HigherSecondary => "higher_secondary",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "preprimary" => Some(Self::Preprimary),
            "primary" => Some(Self::Primary),
            "secondary" => Some(Self::Secondary),
            "higher_secondary" => Some(Self::HigherSecondary),
            _ => None,
        }
    }

    /// Parse, reporting unknown values as a validation error.
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| ValidationError::UnknownCategory(s.to_string()))
    }
}

/// Cadence of batch-level tasks and targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cadence {
    Weekly,
    Monthly,
}

impl Default for Cadence {
    fn default() -> Self {
        Self::Weekly
    }
}

impl Cadence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "weekly" => Some(Self::Weekly),
            "monthly" => Some(Self::Monthly),
            _ => None,
        }
    }

    /// Parse, reporting unknown values as a validation error.
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_str(s).ok_or_else(|| ValidationError::UnknownCadence(s.to_string()))
    }
}

/// Trim a user-supplied name, rejecting blank input.
pub fn clean_name(field: &'static str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyName { field });
    }
    Ok(trimmed.to_string())
}

/// Trim optional free text, mapping blank input to `None`.
pub fn clean_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_item_type_round_trips_column_values() {
        for item_type in ItemType::ALL {
            assert_eq!(ItemType::from_str(item_type.as_str()), Some(item_type));
        }
        assert_eq!(ItemType::from_str("videos"), None);
    }

    #[test]
    fn test_item_type_parse_error() {
        assert_eq!(
            ItemType::parse("videos"),
            Err(ValidationError::UnknownItemType("videos".to_string()))
        );
    }

    #[test]
    fn test_item_type_serde_matches_columns() {
        let json = serde_json::to_string(&ItemType::Dpps).unwrap();
        assert_eq!(json, "\"dpps\"");
    }

    #[test]
    fn test_category_serde_snake_case() {
        let json = serde_json::to_string(&TargetCategory::HigherSecondary).unwrap();
        assert_eq!(json, "\"higher_secondary\"");
        assert_eq!(
            TargetCategory::from_str("higher_secondary"),
            Some(TargetCategory::HigherSecondary)
        );
    }

    #[test]
    fn test_status_default_is_incomplete() {
        assert_eq!(ItemStatus::default(), ItemStatus::Incomplete);
    }

    #[test]
    fn test_singular_labels() {
        assert_eq!(ItemType::Lectures.singular(), "lecture");
        assert_eq!(ItemType::Homework.singular(), "homework");
    }

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name("name", "  Optics  ").unwrap(), "Optics");
        assert_eq!(
            clean_name("name", "   "),
            Err(ValidationError::EmptyName { field: "name" })
        );
    }

    #[test]
    fn test_clean_optional() {
        assert_eq!(clean_optional(Some("  ")), None);
        assert_eq!(clean_optional(Some(" read ch. 2 ")), Some("read ch. 2".to_string()));
        assert_eq!(clean_optional(None), None);
    }
}
