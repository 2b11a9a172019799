//! Report error types.

use thiserror::Error;
use uuid::Uuid;

use crate::files::FieldError;
use crate::storage::StorageError;

/// Report operation errors.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Input validation failed. Nothing was sent.
    #[error("validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// The selected attachment is not one of the caller's files.
    #[error("selected file not found: {0}")]
    FileNotFound(Uuid),

    /// Reading the attachment from storage failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Repository lookup failed.
    #[error("repository error: {0}")]
    Repository(String),

    /// The mail transport refused or failed the send.
    #[error("failed to send report: {0}")]
    Send(String),
}
