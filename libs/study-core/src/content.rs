//! Bulk creation of content items.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};
use crate::types::{clean_name, ItemType};

/// Largest number of items one bulk request may create.
pub const MAX_BULK_COUNT: u32 = 200;

/// Request to create `count` items of one type sharing the same name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BulkCreate {
    pub item_type: String,
    pub count: i64,
    pub name: String,
}

/// A validated bulk request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidBulk {
    pub item_type: ItemType,
    pub count: u32,
    pub name: String,
}

impl BulkCreate {
    /// Validate every field, collecting all failures.
    pub fn validate(&self) -> Result<ValidBulk> {
        let item_type = ItemType::parse(self.item_type.trim());
        let name = clean_name("name", &self.name);
        let count = u32::try_from(self.count)
            .ok()
            .filter(|c| (1..=MAX_BULK_COUNT).contains(c))
            .ok_or(ValidationError::InvalidCount(self.count));

        match (item_type, name, count) {
            (Ok(item_type), Ok(name), Ok(count)) => Ok(ValidBulk {
                item_type,
                count,
                name,
            }),
            (item_type, name, count) => {
                let mut errors: Vec<ValidationError> = [item_type.err(), name.err(), count.err()]
                    .into_iter()
                    .flatten()
                    .collect();
                if errors.len() == 1 {
                    Err(errors.remove(0))
                } else {
                    Err(ValidationError::Fields(errors))
                }
            }
        }
    }
}

/// Highest existing number, or 0 when the section is empty.
pub fn last_number<I>(numbers: I) -> i32
where
    I: IntoIterator<Item = i32>,
{
    numbers.into_iter().max().unwrap_or(0).max(0)
}

/// Numbers for `count` new items following `last`.
pub fn next_numbers(last: i32, count: u32) -> RangeInclusive<i32> {
    let first = last.max(0) + 1;
    let count = i32::try_from(count).unwrap_or(i32::MAX);
    first..=first.saturating_add(count.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_numbers_follow_existing_max() {
        let numbers: Vec<i32> = next_numbers(3, 5).collect();
        assert_eq!(numbers, vec![4, 5, 6, 7, 8]);
    }

    #[test]
    fn test_numbers_start_at_one_for_empty_section() {
        let last = last_number(Vec::new());
        assert_eq!(last, 0);
        let numbers: Vec<i32> = next_numbers(last, 3).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
    }

    #[test]
    fn test_last_number_ignores_gaps() {
        assert_eq!(last_number(vec![1, 2, 7, 4]), 7);
    }

    #[test]
    fn test_validate_rejects_zero_and_negative_counts() {
        for count in [0, -4] {
            let bulk = BulkCreate {
                item_type: "notes".to_string(),
                count,
                name: "Notes".to_string(),
            };
            assert_eq!(bulk.validate(), Err(ValidationError::InvalidCount(count)));
        }
    }

    #[test]
    fn test_validate_trims_name() {
        let bulk = BulkCreate {
            item_type: "lectures".to_string(),
            count: 20,
            name: "  Basic math lecture ".to_string(),
        };
        let valid = bulk.validate().unwrap();
        assert_eq!(valid.item_type, ItemType::Lectures);
        assert_eq!(valid.name, "Basic math lecture");
        assert_eq!(valid.count, 20);
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        let bulk = BulkCreate {
            item_type: "dpps".to_string(),
            count: 2,
            name: "   ".to_string(),
        };
        assert_eq!(
            bulk.validate(),
            Err(ValidationError::EmptyName { field: "name" })
        );
    }

    #[test]
    fn test_validate_caps_count() {
        let mut bulk = BulkCreate {
            item_type: "homework".to_string(),
            count: i64::from(MAX_BULK_COUNT),
            name: "Worksheet".to_string(),
        };
        assert_eq!(bulk.validate().unwrap().count, MAX_BULK_COUNT);

        for count in [i64::from(MAX_BULK_COUNT) + 1, 4_000_000_000] {
            bulk.count = count;
            assert_eq!(bulk.validate(), Err(ValidationError::InvalidCount(count)));
        }
    }

    #[test]
    fn test_validate_rejects_unknown_item_type() {
        let bulk = BulkCreate {
            item_type: "videos".to_string(),
            count: 2,
            name: "Intro".to_string(),
        };
        assert_eq!(
            bulk.validate(),
            Err(ValidationError::UnknownItemType("videos".to_string()))
        );
    }

    #[test]
    fn test_validate_collects_every_failure() {
        let bulk = BulkCreate {
            item_type: "videos".to_string(),
            count: 0,
            name: " ".to_string(),
        };
        let fields: Vec<_> = bulk
            .validate()
            .unwrap_err()
            .into_list()
            .iter()
            .map(|e| e.field())
            .collect();
        assert_eq!(fields, vec![Some("item_type"), Some("name"), Some("count")]);
    }
}
