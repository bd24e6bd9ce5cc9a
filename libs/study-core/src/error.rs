//! Error types for study-core.

use thiserror::Error;

/// Result type alias using ValidationError.
pub type Result<T> = std::result::Result<T, ValidationError>;

/// Field-level validation failures, raised before anything touches storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} must not be empty")]
    EmptyName { field: &'static str },

    #[error("{field} must be at least {min} characters")]
    NameTooShort { field: &'static str, min: usize },

    #[error("unknown target category: {0}")]
    UnknownCategory(String),

    #[error("unknown item type: {0}")]
    UnknownItemType(String),

    #[error("unknown status: {0}")]
    UnknownStatus(String),

    #[error("unknown cadence: {0}")]
    UnknownCadence(String),

    #[error("{field} must be a HH:MM time, got '{value}'")]
    InvalidTime { field: &'static str, value: String },

    #[error("count must be between 1 and {max}, got {0}", max = crate::content::MAX_BULK_COUNT)]
    InvalidCount(i64),

    #[error("target value must be between 0 and 100, got {0}")]
    TargetValueOutOfRange(i32),

    #[error("{0} must be selected first")]
    MissingSelection(&'static str),

    #[error("no content items selected")]
    NothingSelected,

    #[error("{}", join_messages(.0))]
    Fields(Vec<ValidationError>),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationError {
    /// Name of the form field the error belongs to, when there is one.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::EmptyName { field } | Self::NameTooShort { field, .. } => Some(field),
            Self::InvalidTime { field, .. } => Some(field),
            Self::UnknownCategory(_) => Some("category"),
            Self::UnknownItemType(_) => Some("item_type"),
            Self::UnknownStatus(_) => Some("status"),
            Self::UnknownCadence(_) => Some("cadence"),
            Self::InvalidCount(_) => Some("count"),
            Self::TargetValueOutOfRange(_) => Some("target_value"),
            Self::MissingSelection(_) | Self::NothingSelected | Self::Fields(_) => None,
        }
    }

    /// Flatten into the individual field errors.
    pub fn into_list(self) -> Vec<ValidationError> {
        match self {
            Self::Fields(errors) => errors,
            other => vec![other],
        }
    }
}
