//! HTTP route definitions.
//!
//! Two parallel surfaces drive the same file lifecycle service: a JSON REST
//! resource under `/api/v1` and a server-rendered form surface at the root.

use axum::{
    Json, Router,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::sync::Arc;

use crate::{AppState, middleware::auth::auth_middleware};
use filedepot_core::files::FileService;
use filedepot_core::notify::EmailNotifier;
use filedepot_core::report::ReportService;
use filedepot_core::stats::StatsService;
use filedepot_db::repositories::{FileRecordRepository, StatsRepository};
use filedepot_shared::{AppError, EmailService};

pub mod files;
pub mod forms;
pub mod health;
pub mod ml;
pub mod stats;

mod html;

/// Creates the application router: public health check, protected REST
/// resource, and protected form pages.
pub fn app_routes(state: AppState) -> Router<AppState> {
    let api = Router::new()
        .merge(files::routes())
        .merge(ml::routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .merge(health::routes());

    let pages = Router::new()
        .merge(forms::routes())
        .merge(stats::routes())
        .layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new().nest("/api/v1", api).merge(pages)
}

/// The concrete file service wired to this deployment's stores.
pub(crate) type AppFileService = FileService<FileRecordRepository, EmailNotifier<EmailService>>;

/// The concrete report service.
pub(crate) type AppReportService = ReportService<FileRecordRepository, EmailService>;

/// Builds the file lifecycle service for one request.
pub(crate) fn file_service(state: &AppState) -> AppFileService {
    let repo = FileRecordRepository::new((*state.db).clone());
    let notifier = EmailNotifier::new(
        (*state.email_service).clone(),
        state.storage.clone(),
        state.email_service.config().ops_mailbox.clone(),
    );
    FileService::new(Arc::new(repo), state.storage.clone(), Arc::new(notifier))
}

/// Builds the report service for one request.
pub(crate) fn report_service(state: &AppState) -> AppReportService {
    let repo = FileRecordRepository::new((*state.db).clone());
    ReportService::new(
        Arc::new(repo),
        state.storage.clone(),
        Arc::new((*state.email_service).clone()),
    )
}

/// Builds the stats service for one request.
pub(crate) fn stats_service(state: &AppState) -> StatsService<StatsRepository> {
    let repo = StatsRepository::new((*state.db).clone());
    StatsService::new(
        Arc::new(repo),
        state.storage.clone(),
        state.email_service.config().is_configured(),
    )
}

/// Render a shared error as the JSON error envelope.
pub(crate) fn error_response(err: &AppError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    (
        status,
        Json(json!({
            "error": err.error_code(),
            "message": err.to_string(),
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use sea_orm::DatabaseConnection;
    use tower::ServiceExt;

    use filedepot_core::storage::{BlobStore, StorageConfig, StorageProvider};
    use filedepot_shared::{EmailConfig, JwtConfig, JwtService};

    /// AppState over a disconnected database; enough for routes that never
    /// reach a repository.
    fn test_state(dir: &tempfile::TempDir) -> AppState {
        let storage_config = StorageConfig::new(StorageProvider::local_fs(dir.path()));
        let storage = BlobStore::from_config(storage_config).expect("should create store");

        AppState {
            db: Arc::new(DatabaseConnection::default()),
            jwt_service: Arc::new(JwtService::new(JwtConfig::default())),
            email_service: Arc::new(EmailService::new(EmailConfig::default())),
            storage: Arc::new(storage),
        }
    }

    fn test_router(state: AppState) -> Router {
        Router::new()
            .merge(app_routes(state.clone()))
            .with_state(state)
    }

    #[tokio::test]
    async fn test_health_is_public() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = test_router(test_state(&dir));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "healthy");
    }

    #[tokio::test]
    async fn test_rest_list_requires_auth() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = test_router(test_state(&dir));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/files")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_rest_rejects_garbage_token() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = test_router(test_state(&dir));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/v1/files")
                    .header("Authorization", "Bearer not-a-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "invalid_token");
    }

    #[tokio::test]
    async fn test_predict_requires_auth() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = test_router(test_state(&dir));

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/predict")
                    .header("Content-Type", "application/json")
                    .body(Body::from(r#"{"input":[1,2,3]}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_form_surface_requires_auth() {
        let dir = tempfile::tempdir().expect("tempdir");
        let app = test_router(test_state(&dir));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/files/upload")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
