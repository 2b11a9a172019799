//! File lifecycle service implementation.

use std::sync::Arc;

use tracing::warn;
use uuid::Uuid;

use super::error::FileError;
use super::types::{CreateRecordInput, FileRecord, UpdateRecordInput, UploadInput, validate_content};
use crate::notify::{FileEvent, Notifier};
use crate::storage::BlobStore;

/// Repository trait for file record persistence.
///
/// This trait is implemented by the db crate to provide actual database
/// operations. Every lookup is scoped to the owning user.
pub trait FileRepository: Send + Sync {
    /// Create a new file record.
    fn create(
        &self,
        input: CreateRecordInput,
    ) -> impl std::future::Future<Output = Result<FileRecord, FileError>> + Send;

    /// Find a record by ID, scoped to its owner.
    fn find_by_id(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Option<FileRecord>, FileError>> + Send;

    /// List all records for an owner, most recent first.
    fn list_by_owner(
        &self,
        owner_id: Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<FileRecord>, FileError>> + Send;

    /// Update a record's blob path, filename, and description.
    fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        input: UpdateRecordInput,
    ) -> impl std::future::Future<Output = Result<FileRecord, FileError>> + Send;

    /// Delete a record by ID. Returns whether a row was removed.
    fn delete(
        &self,
        id: Uuid,
        owner_id: Uuid,
    ) -> impl std::future::Future<Output = Result<bool, FileError>> + Send;
}

/// File lifecycle service.
///
/// Sequencing per operation: validate, persist the blob, persist the record,
/// then notify. The notification is best-effort and never affects the
/// primary result.
pub struct FileService<R: FileRepository, N: Notifier> {
    repo: Arc<R>,
    storage: Arc<BlobStore>,
    notifier: Arc<N>,
}

impl<R: FileRepository, N: Notifier> FileService<R, N> {
    /// Create a new file service.
    #[must_use]
    pub fn new(repo: Arc<R>, storage: Arc<BlobStore>, notifier: Arc<N>) -> Self {
        Self {
            repo,
            storage,
            notifier,
        }
    }

    /// Upload a new file.
    ///
    /// Writes the blob, creates the record bound to the owner, then sends a
    /// "created" notification.
    ///
    /// # Errors
    ///
    /// Returns `FileError::Validation` on invalid input (nothing is written),
    /// or a storage/repository error if persistence fails.
    pub async fn upload(&self, input: UploadInput) -> Result<FileRecord, FileError> {
        let errors = validate_content(&input.filename, &input.content, &input.description);
        if !errors.is_empty() {
            return Err(FileError::Validation(errors));
        }

        let record_id = Uuid::new_v4();
        let blob_path = BlobStore::generate_key(input.owner_id, record_id, &input.filename);

        self.storage.write(&blob_path, input.content).await?;

        let record = self
            .repo
            .create(CreateRecordInput {
                id: record_id,
                owner_id: input.owner_id,
                filename: input.filename,
                blob_path,
                description: input.description,
            })
            .await?;

        self.notifier.file_event(&record, FileEvent::Created).await;

        Ok(record)
    }

    /// Replace an existing file's content and description.
    ///
    /// The new blob is written first, then the record is updated, and only
    /// then is the old blob removed. There is no window in which the record
    /// points at a missing blob; a crash mid-sequence can leave the old blob
    /// orphaned, which is accepted. `id` and `uploaded_at` never change.
    ///
    /// # Errors
    ///
    /// Returns `FileError::NotFound` if the owner has no record with this
    /// id, `FileError::Validation` on invalid input (the record is left
    /// untouched), or a storage/repository error.
    pub async fn replace(&self, id: Uuid, input: UploadInput) -> Result<FileRecord, FileError> {
        let existing = self
            .repo
            .find_by_id(id, input.owner_id)
            .await?
            .ok_or_else(|| FileError::not_found(id))?;

        let errors = validate_content(&input.filename, &input.content, &input.description);
        if !errors.is_empty() {
            return Err(FileError::Validation(errors));
        }

        let new_blob_path = BlobStore::generate_key(input.owner_id, id, &input.filename);
        self.storage.write(&new_blob_path, input.content).await?;

        let updated = self
            .repo
            .update(
                id,
                input.owner_id,
                UpdateRecordInput {
                    blob_path: new_blob_path,
                    filename: input.filename,
                    description: input.description,
                },
            )
            .await?;

        // Old blob goes last, once the new blob and the row are committed.
        if let Err(e) = self.storage.delete(&existing.blob_path).await {
            warn!(
                blob_path = %existing.blob_path,
                error = %e,
                "failed to remove replaced blob"
            );
        }

        self.notifier
            .file_event(
                &updated,
                FileEvent::Replaced {
                    previous_filename: existing.filename,
                },
            )
            .await;

        Ok(updated)
    }

    /// Delete a file record and its blob.
    ///
    /// The database row is removed first, then the blob is deleted
    /// best-effort; a missing blob is not an error.
    ///
    /// # Errors
    ///
    /// Returns `FileError::NotFound` if the owner has no record with this
    /// id, or a repository error.
    pub async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<(), FileError> {
        let existing = self
            .repo
            .find_by_id(id, owner_id)
            .await?
            .ok_or_else(|| FileError::not_found(id))?;

        let removed = self.repo.delete(id, owner_id).await?;
        if !removed {
            return Err(FileError::not_found(id));
        }

        if let Err(e) = self.storage.delete(&existing.blob_path).await {
            warn!(
                blob_path = %existing.blob_path,
                error = %e,
                "failed to remove deleted file's blob"
            );
        }

        self.notifier
            .file_event(&existing, FileEvent::Deleted)
            .await;

        Ok(())
    }

    /// List all files owned by a user.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository query fails.
    pub async fn list(&self, owner_id: Uuid) -> Result<Vec<FileRecord>, FileError> {
        self.repo.list_by_owner(owner_id).await
    }

    /// Get a single file by id, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns `FileError::NotFound` for a missing or foreign id.
    pub async fn get(&self, id: Uuid, owner_id: Uuid) -> Result<FileRecord, FileError> {
        self.repo
            .find_by_id(id, owner_id)
            .await?
            .ok_or_else(|| FileError::not_found(id))
    }
}
