//! ML request repository.
//!
//! The intake endpoint stores raw payloads for later processing; nothing in
//! this service ever reads them back.

use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, Set};
use uuid::Uuid;

use crate::entities::ml_requests;

/// ML request repository.
#[derive(Debug, Clone)]
pub struct MlRequestRepository {
    db: DatabaseConnection,
}

impl MlRequestRepository {
    /// Creates a new ML request repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Stores an incoming request payload with an empty result.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn create(
        &self,
        user_id: Uuid,
        input_data: serde_json::Value,
    ) -> Result<ml_requests::Model, DbErr> {
        let request = ml_requests::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            input_data: Set(input_data),
            result: Set(None),
            created_at: Set(chrono::Utc::now().into()),
        };

        request.insert(&self.db).await
    }
}
