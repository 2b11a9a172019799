//! ML request intake.
//!
//! Accepts arbitrary JSON payloads and stores them for later processing;
//! no processing happens here.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use serde_json::json;
use tracing::error;

use super::error_response;
use crate::{AppState, middleware::AuthUser};
use filedepot_db::repositories::MlRequestRepository;
use filedepot_shared::AppError;

/// Creates the ML intake routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/predict", post(predict))
}

/// POST `/predict`
/// Store the raw payload with an empty result.
async fn predict(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<serde_json::Value>,
) -> impl IntoResponse {
    let repo = MlRequestRepository::new((*state.db).clone());

    match repo.create(auth.user_id(), payload).await {
        Ok(request) => (
            StatusCode::CREATED,
            Json(json!({
                "status": "ok",
                "request_id": request.id
            })),
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to store ML request");
            error_response(&AppError::Database("failed to store request".to_string()))
        }
    }
}
