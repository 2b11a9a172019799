//! REST resource routes for stored files.
//!
//! list / create / retrieve / update / delete, each scoped to the
//! authenticated caller's own records.

use axum::{
    Json, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Serialize;
use serde_json::json;
use tracing::{error, info};
use uuid::Uuid;

use super::{error_response, file_service};
use crate::{AppState, middleware::AuthUser};
use filedepot_core::files::{FileError, FileRecord, UploadInput};
use filedepot_shared::AppError;

/// Creates the file resource routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/files", get(list_files).post(create_file))
        .route(
            "/files/{id}",
            get(retrieve_file).put(update_file).delete(delete_file),
        )
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response for a stored file.
#[derive(Debug, Serialize)]
pub struct FileResponse {
    /// File ID.
    pub id: Uuid,
    /// Owning user ID.
    pub owner_id: Uuid,
    /// Original filename.
    pub filename: String,
    /// Storage key of the blob.
    pub blob_path: String,
    /// Description.
    pub description: String,
    /// Upload timestamp (ISO 8601).
    pub uploaded_at: String,
}

impl From<FileRecord> for FileResponse {
    fn from(record: FileRecord) -> Self {
        Self {
            id: record.id,
            owner_id: record.owner_id,
            filename: record.filename,
            blob_path: record.blob_path,
            description: record.description,
            uploaded_at: record.uploaded_at.to_rfc3339(),
        }
    }
}

/// The file and description fields of a multipart upload.
pub(crate) struct UploadForm {
    /// Original filename, empty when no file part was sent.
    pub filename: String,
    /// Raw file bytes.
    pub content: Vec<u8>,
    /// Description, empty when absent.
    pub description: String,
}

/// Pull the `file` and `description` fields out of a multipart body.
///
/// Missing parts come back empty and are rejected by the core validation,
/// so the caller gets field-level errors instead of a parse failure.
pub(crate) async fn parse_upload_form(mut multipart: Multipart) -> Result<UploadForm, Response> {
    let mut form = UploadForm {
        filename: String::new(),
        content: Vec::new(),
        description: String::new(),
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return Err(multipart_error(&e.to_string())),
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                form.filename = field.file_name().unwrap_or_default().to_string();
                form.content = match field.bytes().await {
                    Ok(bytes) => bytes.to_vec(),
                    Err(e) => return Err(multipart_error(&e.to_string())),
                };
            }
            "description" => {
                form.description = match field.text().await {
                    Ok(text) => text,
                    Err(e) => return Err(multipart_error(&e.to_string())),
                };
            }
            _ => {}
        }
    }

    Ok(form)
}

fn multipart_error(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": "invalid_multipart",
            "message": message
        })),
    )
        .into_response()
}

/// Map a file error onto the REST status codes.
fn file_error_response(e: &FileError) -> Response {
    match e {
        FileError::Validation(fields) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "validation_error",
                "message": "Invalid input",
                "fields": fields
            })),
        )
            .into_response(),
        FileError::NotFound(_) => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": "not_found",
                "message": "File not found"
            })),
        )
            .into_response(),
        FileError::Storage(storage_err) => {
            let msg = storage_err.to_string();
            if msg.contains("exceeds maximum") {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "file_too_large",
                        "message": msg
                    })),
                )
                    .into_response()
            } else {
                error_response(&AppError::Storage("storage operation failed".to_string()))
            }
        }
        FileError::Repository(_) => {
            error_response(&AppError::Database("an internal error occurred".to_string()))
        }
    }
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/files`
/// List the caller's files.
async fn list_files(State(state): State<AppState>, auth: AuthUser) -> impl IntoResponse {
    let service = file_service(&state);

    match service.list(auth.user_id()).await {
        Ok(files) => {
            let items: Vec<FileResponse> = files.into_iter().map(FileResponse::from).collect();
            (StatusCode::OK, Json(json!({ "files": items }))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to list files");
            file_error_response(&e)
        }
    }
}

/// POST `/files`
/// Upload a new file (multipart: `file`, `description`).
async fn create_file(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> impl IntoResponse {
    let form = match parse_upload_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    let service = file_service(&state);
    let input = UploadInput {
        owner_id: auth.user_id(),
        filename: form.filename,
        content: form.content,
        description: form.description,
    };

    match service.upload(input).await {
        Ok(record) => {
            info!(
                owner_id = %record.owner_id,
                file_id = %record.id,
                filename = %record.filename,
                "File uploaded"
            );
            (StatusCode::CREATED, Json(FileResponse::from(record))).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to upload file");
            file_error_response(&e)
        }
    }
}

/// GET `/files/{id}`
/// Retrieve one of the caller's files.
async fn retrieve_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let service = file_service(&state);

    match service.get(id, auth.user_id()).await {
        Ok(record) => (StatusCode::OK, Json(FileResponse::from(record))).into_response(),
        Err(e) => {
            if !matches!(e, FileError::NotFound(_)) {
                error!(error = %e, "Failed to retrieve file");
            }
            file_error_response(&e)
        }
    }
}

/// PUT `/files/{id}`
/// Replace a file's content and description (multipart: `file`,
/// `description`).
async fn update_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> impl IntoResponse {
    let form = match parse_upload_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    let service = file_service(&state);
    let input = UploadInput {
        owner_id: auth.user_id(),
        filename: form.filename,
        content: form.content,
        description: form.description,
    };

    match service.replace(id, input).await {
        Ok(record) => {
            info!(
                owner_id = %record.owner_id,
                file_id = %record.id,
                filename = %record.filename,
                "File replaced"
            );
            (StatusCode::OK, Json(FileResponse::from(record))).into_response()
        }
        Err(e) => {
            if !matches!(e, FileError::NotFound(_) | FileError::Validation(_)) {
                error!(error = %e, "Failed to replace file");
            }
            file_error_response(&e)
        }
    }
}

/// DELETE `/files/{id}`
/// Delete one of the caller's files.
async fn delete_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> impl IntoResponse {
    let service = file_service(&state);

    match service.delete(id, auth.user_id()).await {
        Ok(()) => {
            info!(owner_id = %auth.user_id(), file_id = %id, "File deleted");
            (StatusCode::NO_CONTENT, ()).into_response()
        }
        Err(e) => {
            if !matches!(e, FileError::NotFound(_)) {
                error!(error = %e, "Failed to delete file");
            }
            file_error_response(&e)
        }
    }
}
