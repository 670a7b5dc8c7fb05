//! Error types for editing and validation

use thiserror::Error;

/// Rejected edits. Out-of-range numbers are clamped rather than reported.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("title must not be empty")]
    EmptyTitle,

    #[error("cannot remove the last image slot")]
    LastImageSlot,

    #[error("a document needs at least one image slot")]
    NoImageSlots,

    #[error("image slot {index} out of range (have {len})")]
    SlotOutOfRange { index: usize, len: usize },

    #[error("'{0}' is not a hex color")]
    InvalidColor(String),
}

impl ValidationError {
    /// Create a slot out of range error
    pub fn slot_out_of_range(index: usize, len: usize) -> Self {
        Self::SlotOutOfRange { index, len }
    }
}

/// Trim a title and reject it when nothing is left
pub fn validate_title(title: &str) -> Result<&str, ValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        Err(ValidationError::EmptyTitle)
    } else {
        Ok(trimmed)
    }
}

/// Accept `#rgb` and `#rrggbb` colors, normalized to lowercase
pub fn validate_hex_color(color: &str) -> Result<String, ValidationError> {
    let trimmed = color.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or("");
    let valid = matches!(digits.len(), 3 | 6) && digits.chars().all(|c| c.is_ascii_hexdigit());
    if valid {
        Ok(trimmed.to_ascii_lowercase())
    } else {
        Err(ValidationError::InvalidColor(color.to_string()))
    }
}
