//! File lifecycle error types.

use thiserror::Error;
use uuid::Uuid;

use super::types::FieldError;
use crate::storage::StorageError;

/// File lifecycle operation errors.
#[derive(Debug, Error)]
pub enum FileError {
    /// Input validation failed. No mutation was performed.
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// No file record with this id is owned by the caller.
    #[error("file not found: {0}")]
    NotFound(Uuid),

    /// Blob storage operation failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Repository operation failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl FileError {
    /// Create a not found error.
    #[must_use]
    pub fn not_found(id: Uuid) -> Self {
        Self::NotFound(id)
    }

    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}
