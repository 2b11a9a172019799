//! Statistics types.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::files::FileRecord;

/// How many recent files the profile view shows.
pub const RECENT_FILES_LIMIT: u64 = 5;

/// Per-user statistics for the profile view.
#[derive(Debug, Clone)]
pub struct ProfileStats {
    /// Total files owned by the user.
    pub total_files: u64,
    /// Timestamp of the most recent upload, if any.
    pub last_activity: Option<DateTime<Utc>>,
    /// The user's most recent files, newest first, capped.
    pub recent_files: Vec<FileRecord>,
}

/// Sitewide statistics for the status view.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemStatus {
    /// Number of registered users.
    pub total_users: u64,
    /// Total size of all blobs still present in storage, in megabytes,
    /// rounded to two decimals. Missing blobs contribute zero.
    pub total_blob_size_mb: f64,
    /// Whether the mail transport is fully configured.
    pub email_configured: bool,
}

/// Statistics errors.
#[derive(Debug, Error)]
pub enum StatsError {
    /// Repository query failed.
    #[error("repository error: {0}")]
    Repository(String),
}

impl StatsError {
    /// Create a repository error.
    #[must_use]
    pub fn repository(msg: impl Into<String>) -> Self {
        Self::Repository(msg.into())
    }
}
