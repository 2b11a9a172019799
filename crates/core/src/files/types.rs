//! File domain types and input validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length of a file description.
pub const MAX_DESCRIPTION_LEN: usize = 100;

/// A stored file's metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Unique identifier.
    pub id: Uuid,
    /// Owning user. Immutable after creation.
    pub owner_id: Uuid,
    /// Original upload filename. Updated on replace.
    pub filename: String,
    /// Storage key of the current blob. Updated on replace.
    pub blob_path: String,
    /// Free-text description, may be empty.
    pub description: String,
    /// Creation timestamp. Never updated, even on replace.
    pub uploaded_at: DateTime<Utc>,
}

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the offending field.
    pub field: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl FieldError {
    /// Creates a new field error.
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Input for uploading a new file or replacing an existing one.
#[derive(Debug, Clone)]
pub struct UploadInput {
    /// Owning user.
    pub owner_id: Uuid,
    /// Original filename.
    pub filename: String,
    /// Raw file bytes.
    pub content: Vec<u8>,
    /// Description, may be empty.
    pub description: String,
}

/// Input for creating a file record.
#[derive(Debug, Clone)]
pub struct CreateRecordInput {
    /// Record ID.
    pub id: Uuid,
    /// Owning user.
    pub owner_id: Uuid,
    /// Original filename.
    pub filename: String,
    /// Storage key of the blob.
    pub blob_path: String,
    /// Description.
    pub description: String,
}

/// Input for updating a file record on replace.
#[derive(Debug, Clone)]
pub struct UpdateRecordInput {
    /// Storage key of the new blob.
    pub blob_path: String,
    /// New filename.
    pub filename: String,
    /// New description.
    pub description: String,
}

/// Validate upload content and metadata, collecting every field error.
#[must_use]
pub fn validate_content(filename: &str, content: &[u8], description: &str) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if filename.trim().is_empty() {
        errors.push(FieldError::new("file", "a file is required"));
    }
    if content.is_empty() {
        errors.push(FieldError::new("file", "the submitted file is empty"));
    }
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        errors.push(FieldError::new(
            "description",
            format!("description must be at most {MAX_DESCRIPTION_LEN} characters"),
        ));
    }

    errors
}
