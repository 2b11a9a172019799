//! Stats service implementation.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::types::{ProfileStats, RECENT_FILES_LIMIT, StatsError, SystemStatus};
use crate::files::FileRecord;
use crate::storage::BlobStore;

/// Repository trait for aggregate queries.
///
/// Implemented by the db crate over the users and stored files tables.
pub trait StatsRepository: Send + Sync {
    /// Count files owned by a user.
    fn count_files(
        &self,
        owner_id: Uuid,
    ) -> impl std::future::Future<Output = Result<u64, StatsError>> + Send;

    /// The user's most recent files, newest first, up to `limit`.
    fn recent_files(
        &self,
        owner_id: Uuid,
        limit: u64,
    ) -> impl std::future::Future<Output = Result<Vec<FileRecord>, StatsError>> + Send;

    /// Timestamp of the user's most recent upload.
    fn last_activity(
        &self,
        owner_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<DateTime<Utc>>, StatsError>> + Send;

    /// Count all registered users.
    fn count_users(&self)
        -> impl std::future::Future<Output = Result<u64, StatsError>> + Send;

    /// Blob paths of every stored file, sitewide.
    fn all_blob_paths(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<String>, StatsError>> + Send;
}

/// Service computing profile and status aggregates.
pub struct StatsService<R: StatsRepository> {
    repo: Arc<R>,
    storage: Arc<BlobStore>,
    email_configured: bool,
}

impl<R: StatsRepository> StatsService<R> {
    /// Create a new stats service.
    ///
    /// `email_configured` is the configuration-presence check result for the
    /// mail transport, evaluated by the caller.
    #[must_use]
    pub fn new(repo: Arc<R>, storage: Arc<BlobStore>, email_configured: bool) -> Self {
        Self {
            repo,
            storage,
            email_configured,
        }
    }

    /// Per-user statistics for the profile view.
    ///
    /// # Errors
    ///
    /// Returns an error if a repository query fails.
    pub async fn profile_stats(&self, owner_id: Uuid) -> Result<ProfileStats, StatsError> {
        let total_files = self.repo.count_files(owner_id).await?;
        let last_activity = self.repo.last_activity(owner_id).await?;
        let recent_files = self.repo.recent_files(owner_id, RECENT_FILES_LIMIT).await?;

        Ok(ProfileStats {
            total_files,
            last_activity,
            recent_files,
        })
    }

    /// Sitewide statistics for the status view.
    ///
    /// Sums the size of every blob that still exists; a blob missing from
    /// storage contributes zero.
    ///
    /// # Errors
    ///
    /// Returns an error if a repository query fails.
    pub async fn system_status(&self) -> Result<SystemStatus, StatsError> {
        let total_users = self.repo.count_users().await?;

        let mut total_bytes: u64 = 0;
        for path in self.repo.all_blob_paths().await? {
            if let Some(size) = self.storage.size(&path).await {
                total_bytes += size;
            }
        }

        Ok(SystemStatus {
            total_users,
            total_blob_size_mb: bytes_to_mb(total_bytes),
            email_configured: self.email_configured,
        })
    }
}

/// Convert bytes to megabytes, rounded to two decimals.
#[allow(clippy::cast_precision_loss)]
fn bytes_to_mb(bytes: u64) -> f64 {
    let mb = bytes as f64 / (1024.0 * 1024.0);
    (mb * 100.0).round() / 100.0
}
