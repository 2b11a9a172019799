//! File record repository for database operations.
//!
//! Implements the core `FileRepository` trait using SeaORM. Every lookup is
//! scoped to the owning user.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entities::stored_files;
use filedepot_core::files::{
    CreateRecordInput, FileError, FileRecord, FileRepository as FileRepoTrait, UpdateRecordInput,
};

/// File record repository implementation.
#[derive(Debug, Clone)]
pub struct FileRecordRepository {
    db: DatabaseConnection,
}

impl FileRecordRepository {
    /// Create a new file record repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl FileRepoTrait for FileRecordRepository {
    async fn create(&self, input: CreateRecordInput) -> Result<FileRecord, FileError> {
        let active_model = stored_files::ActiveModel {
            id: Set(input.id),
            owner_id: Set(input.owner_id),
            filename: Set(input.filename),
            blob_path: Set(input.blob_path),
            description: Set(input.description),
            uploaded_at: Set(Utc::now().into()),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| FileError::repository(e.to_string()))?;

        Ok(to_domain(model))
    }

    async fn find_by_id(&self, id: Uuid, owner_id: Uuid) -> Result<Option<FileRecord>, FileError> {
        let model = stored_files::Entity::find_by_id(id)
            .filter(stored_files::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await
            .map_err(|e| FileError::repository(e.to_string()))?;

        Ok(model.map(to_domain))
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<FileRecord>, FileError> {
        let models = stored_files::Entity::find()
            .filter(stored_files::Column::OwnerId.eq(owner_id))
            .order_by_desc(stored_files::Column::UploadedAt)
            .all(&self.db)
            .await
            .map_err(|e| FileError::repository(e.to_string()))?;

        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn update(
        &self,
        id: Uuid,
        owner_id: Uuid,
        input: UpdateRecordInput,
    ) -> Result<FileRecord, FileError> {
        let model = stored_files::Entity::find_by_id(id)
            .filter(stored_files::Column::OwnerId.eq(owner_id))
            .one(&self.db)
            .await
            .map_err(|e| FileError::repository(e.to_string()))?
            .ok_or_else(|| FileError::not_found(id))?;

        // uploaded_at stays untouched: replace keeps the creation time.
        let mut active_model: stored_files::ActiveModel = model.into();
        active_model.blob_path = Set(input.blob_path);
        active_model.filename = Set(input.filename);
        active_model.description = Set(input.description);

        let model = active_model
            .update(&self.db)
            .await
            .map_err(|e| FileError::repository(e.to_string()))?;

        Ok(to_domain(model))
    }

    async fn delete(&self, id: Uuid, owner_id: Uuid) -> Result<bool, FileError> {
        let result = stored_files::Entity::delete_many()
            .filter(stored_files::Column::Id.eq(id))
            .filter(stored_files::Column::OwnerId.eq(owner_id))
            .exec(&self.db)
            .await
            .map_err(|e| FileError::repository(e.to_string()))?;

        Ok(result.rows_affected > 0)
    }
}

/// Convert database model to domain model.
fn to_domain(model: stored_files::Model) -> FileRecord {
    FileRecord {
        id: model.id,
        owner_id: model.owner_id,
        filename: model.filename,
        blob_path: model.blob_path,
        description: model.description,
        uploaded_at: model.uploaded_at.with_timezone(&chrono::Utc),
    }
}
