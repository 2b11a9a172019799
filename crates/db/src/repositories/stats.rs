//! Aggregate query repository for the stats service.

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::entities::{stored_files, users};
use filedepot_core::files::FileRecord;
use filedepot_core::stats::{StatsError, StatsRepository as StatsRepoTrait};

/// Stats repository implementation over the users and stored files tables.
#[derive(Debug, Clone)]
pub struct StatsRepository {
    db: DatabaseConnection,
}

impl StatsRepository {
    /// Create a new stats repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

impl StatsRepoTrait for StatsRepository {
    async fn count_files(&self, owner_id: Uuid) -> Result<u64, StatsError> {
        stored_files::Entity::find()
            .filter(stored_files::Column::OwnerId.eq(owner_id))
            .count(&self.db)
            .await
            .map_err(|e| StatsError::repository(e.to_string()))
    }

    async fn recent_files(
        &self,
        owner_id: Uuid,
        limit: u64,
    ) -> Result<Vec<FileRecord>, StatsError> {
        let models = stored_files::Entity::find()
            .filter(stored_files::Column::OwnerId.eq(owner_id))
            .order_by_desc(stored_files::Column::UploadedAt)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(|e| StatsError::repository(e.to_string()))?;

        Ok(models
            .into_iter()
            .map(|model| FileRecord {
                id: model.id,
                owner_id: model.owner_id,
                filename: model.filename,
                blob_path: model.blob_path,
                description: model.description,
                uploaded_at: model.uploaded_at.with_timezone(&Utc),
            })
            .collect())
    }

    async fn last_activity(&self, owner_id: Uuid) -> Result<Option<DateTime<Utc>>, StatsError> {
        let model = stored_files::Entity::find()
            .filter(stored_files::Column::OwnerId.eq(owner_id))
            .order_by_desc(stored_files::Column::UploadedAt)
            .one(&self.db)
            .await
            .map_err(|e| StatsError::repository(e.to_string()))?;

        Ok(model.map(|m| m.uploaded_at.with_timezone(&Utc)))
    }

    async fn count_users(&self) -> Result<u64, StatsError> {
        users::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| StatsError::repository(e.to_string()))
    }

    async fn all_blob_paths(&self) -> Result<Vec<String>, StatsError> {
        let models = stored_files::Entity::find()
            .all(&self.db)
            .await
            .map_err(|e| StatsError::repository(e.to_string()))?;

        Ok(models.into_iter().map(|m| m.blob_path).collect())
    }
}
