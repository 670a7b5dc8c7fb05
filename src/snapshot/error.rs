//! Error types for the snapshot store

use thiserror::Error;

use super::types::Collection;
use crate::error::ValidationError;

/// Failures of the durable medium or of (de)serializing its contents
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read '{key}': {reason}")]
    Read { key: String, reason: String },

    #[error("failed to write '{key}': {reason}")]
    Write { key: String, reason: String },

    #[error("stored value for '{key}' is not valid: {source}")]
    Parse {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize '{key}': {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl PersistenceError {
    pub fn read(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Read {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn write(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Write {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn parse(key: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Parse {
            key: key.into(),
            source,
        }
    }
}

/// Errors returned by snapshot store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("no {collection} with id '{id}'")]
    NotFound { collection: Collection, id: String },

    #[error(transparent)]
    Persistence(#[from] PersistenceError),
}

impl StoreError {
    pub fn not_found(collection: Collection, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection,
            id: id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = StoreError::not_found(Collection::Configurations, "42");
        assert_eq!(err.to_string(), "no configuration with id '42'");
    }

    #[test]
    fn test_validation_is_transparent() {
        let err = StoreError::from(ValidationError::EmptyTitle);
        assert_eq!(err.to_string(), "title must not be empty");
    }

    #[test]
    fn test_write_display() {
        let err = PersistenceError::write("savedDocuments", "disk full");
        assert_eq!(err.to_string(), "failed to write 'savedDocuments': disk full");
    }
}
