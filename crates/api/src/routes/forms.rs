//! Form-style routes for the server-rendered surface.
//!
//! Each flow is a GET-to-render / POST-to-mutate pair. Successful mutations
//! redirect to the file list; validation failures re-render the same form
//! with field errors and a 200 status. The report flow additionally
//! re-renders when the mail transport fails, so the sender can see the
//! message did not go out.

use axum::{
    Form, Router,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tracing::error;
use uuid::Uuid;

use super::files::parse_upload_form;
use super::html::{error_list, escape, layout};
use super::{file_service, report_service};
use crate::{AppState, middleware::AuthUser};
use filedepot_core::files::{FieldError, FileError, FileRecord, UploadInput};
use filedepot_core::report::{ReportError, ReportInput};

/// Creates the form-surface routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/files", get(list_page))
        .route("/files/upload", get(upload_page).post(submit_upload))
        .route("/files/{id}/replace", get(replace_page).post(submit_replace))
        .route("/files/{id}/delete", post(submit_delete))
        .route("/report", get(report_page).post(submit_report))
}

// ============================================================================
// Rendering
// ============================================================================

fn render_list(files: &[FileRecord]) -> String {
    let rows: String = files
        .iter()
        .map(|f| {
            format!(
                r#"<tr>
<td>{filename}</td>
<td>{description}</td>
<td>{uploaded_at}</td>
<td>
<a href="/files/{id}/replace">Replace</a>
<form method="post" action="/files/{id}/delete"><button type="submit">Delete</button></form>
</td>
</tr>"#,
                filename = escape(&f.filename),
                description = escape(&f.description),
                uploaded_at = f.uploaded_at.format("%Y-%m-%d %H:%M"),
                id = f.id,
            )
        })
        .collect();

    layout(
        "Your files",
        &format!(
            r"<table>
<tr><th>File</th><th>Description</th><th>Uploaded</th><th></th></tr>
{rows}
</table>"
        ),
    )
}

fn render_upload_form(description: &str, errors: &[FieldError]) -> String {
    layout(
        "Upload a file",
        &format!(
            r#"{errors}
<form method="post" action="/files/upload" enctype="multipart/form-data">
<p><label>File <input type="file" name="file"></label></p>
<p><label>Description <input type="text" name="description" maxlength="100" value="{description}"></label></p>
<p><button type="submit">Upload</button></p>
</form>"#,
            errors = error_list(errors),
            description = escape(description),
        ),
    )
}

fn render_replace_form(record: &FileRecord, description: &str, errors: &[FieldError]) -> String {
    layout(
        "Replace a file",
        &format!(
            r#"{errors}
<p>Current file: {filename}</p>
<form method="post" action="/files/{id}/replace" enctype="multipart/form-data">
<p><label>File <input type="file" name="file"></label></p>
<p><label>Description <input type="text" name="description" maxlength="100" value="{description}"></label></p>
<p><button type="submit">Replace</button></p>
</form>"#,
            errors = error_list(errors),
            filename = escape(&record.filename),
            id = record.id,
            description = escape(description),
        ),
    )
}

fn render_report_form(
    files: &[FileRecord],
    form: &ReportForm,
    errors: &[FieldError],
    banner: Option<&str>,
) -> String {
    let banner = banner.map_or_else(String::new, |message| {
        format!("<p class=\"banner\">{}</p>", escape(message))
    });
    let options: String = files
        .iter()
        .map(|f| {
            format!(
                r#"<option value="{id}">{filename}</option>"#,
                id = f.id,
                filename = escape(&f.filename),
            )
        })
        .collect();

    layout(
        "Send a report",
        &format!(
            r#"{banner}
{errors}
<form method="post" action="/report">
<p><label>Recipient <input type="email" name="to_email" value="{to_email}"></label></p>
<p><label>Subject <input type="text" name="subject" maxlength="100" value="{subject}"></label></p>
<p><label>Message <textarea name="message">{message}</textarea></label></p>
<p><label>Attach file
<select name="selected_file">
<option value="">No attachment</option>
{options}
</select>
</label></p>
<p><button type="submit">Send</button></p>
</form>"#,
            errors = error_list(errors),
            to_email = escape(&form.to_email),
            subject = escape(&form.subject),
            message = escape(&form.message),
        ),
    )
}

fn not_found_page() -> Response {
    (
        StatusCode::NOT_FOUND,
        Html(layout("Not found", "<p>No such file.</p>")),
    )
        .into_response()
}

fn internal_error_page() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Html(layout("Error", "<p>Something went wrong.</p>")),
    )
        .into_response()
}

// ============================================================================
// File flows
// ============================================================================

/// GET `/files` - list view.
async fn list_page(State(state): State<AppState>, auth: AuthUser) -> Response {
    let service = file_service(&state);

    match service.list(auth.user_id()).await {
        Ok(files) => Html(render_list(&files)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to render file list");
            internal_error_page()
        }
    }
}

/// GET `/files/upload` - upload form.
async fn upload_page() -> Html<String> {
    Html(render_upload_form("", &[]))
}

/// POST `/files/upload` - create a file, then redirect to the list.
async fn submit_upload(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Response {
    let form = match parse_upload_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    let service = file_service(&state);
    let description = form.description.clone();
    let input = UploadInput {
        owner_id: auth.user_id(),
        filename: form.filename,
        content: form.content,
        description: form.description,
    };

    match service.upload(input).await {
        Ok(_) => Redirect::to("/files").into_response(),
        Err(FileError::Validation(errors)) => {
            Html(render_upload_form(&description, &errors)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to upload file");
            internal_error_page()
        }
    }
}

/// GET `/files/{id}/replace` - replace form.
async fn replace_page(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Response {
    let service = file_service(&state);

    match service.get(id, auth.user_id()).await {
        Ok(record) => {
            let description = record.description.clone();
            Html(render_replace_form(&record, &description, &[])).into_response()
        }
        Err(FileError::NotFound(_)) => not_found_page(),
        Err(e) => {
            error!(error = %e, "Failed to render replace form");
            internal_error_page()
        }
    }
}

/// POST `/files/{id}/replace` - replace a file, then redirect to the list.
async fn submit_replace(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Response {
    let form = match parse_upload_form(multipart).await {
        Ok(form) => form,
        Err(response) => return response,
    };

    let service = file_service(&state);
    let description = form.description.clone();
    let input = UploadInput {
        owner_id: auth.user_id(),
        filename: form.filename,
        content: form.content,
        description: form.description,
    };

    match service.replace(id, input).await {
        Ok(_) => Redirect::to("/files").into_response(),
        Err(FileError::Validation(errors)) => {
            match service.get(id, auth.user_id()).await {
                Ok(record) => {
                    Html(render_replace_form(&record, &description, &errors)).into_response()
                }
                Err(_) => not_found_page(),
            }
        }
        Err(FileError::NotFound(_)) => not_found_page(),
        Err(e) => {
            error!(error = %e, "Failed to replace file");
            internal_error_page()
        }
    }
}

/// POST `/files/{id}/delete` - delete a file, then redirect to the list.
async fn submit_delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Response {
    let service = file_service(&state);

    match service.delete(id, auth.user_id()).await {
        Ok(()) => Redirect::to("/files").into_response(),
        Err(FileError::NotFound(_)) => not_found_page(),
        Err(e) => {
            error!(error = %e, "Failed to delete file");
            internal_error_page()
        }
    }
}

// ============================================================================
// Report flow
// ============================================================================

/// Report form fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportForm {
    /// Recipient address.
    #[serde(default)]
    pub to_email: String,
    /// Subject line.
    #[serde(default)]
    pub subject: String,
    /// Message body.
    #[serde(default)]
    pub message: String,
    /// Selected file id, empty for no attachment.
    #[serde(default)]
    pub selected_file: String,
}

impl ReportForm {
    /// Parse the selected file id, treating an empty value as no selection.
    fn selected_file_id(&self) -> Result<Option<Uuid>, FieldError> {
        if self.selected_file.is_empty() {
            return Ok(None);
        }

        Uuid::parse_str(&self.selected_file)
            .map(Some)
            .map_err(|_| FieldError::new("selected_file", "unknown file selection"))
    }
}

/// GET `/report` - report form.
async fn report_page(State(state): State<AppState>, auth: AuthUser) -> Response {
    let service = file_service(&state);

    match service.list(auth.user_id()).await {
        Ok(files) => {
            Html(render_report_form(&files, &ReportForm::default(), &[], None)).into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to render report form");
            internal_error_page()
        }
    }
}

/// POST `/report` - send a report, then redirect to the list.
///
/// Validation and transport failures both re-render the form with a 200, so
/// the lack of a redirect is the caller's signal that nothing was sent.
async fn submit_report(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<ReportForm>,
) -> Response {
    let files = match file_service(&state).list(auth.user_id()).await {
        Ok(files) => files,
        Err(e) => {
            error!(error = %e, "Failed to load files for report form");
            return internal_error_page();
        }
    };

    let selected_file = match form.selected_file_id() {
        Ok(selected) => selected,
        Err(field_error) => {
            return Html(render_report_form(&files, &form, &[field_error], None)).into_response();
        }
    };

    let service = report_service(&state);
    let input = ReportInput {
        owner_id: auth.user_id(),
        to_email: form.to_email.clone(),
        subject: form.subject.clone(),
        message: form.message.clone(),
        selected_file,
    };

    match service.send(input).await {
        Ok(()) => Redirect::to("/files").into_response(),
        Err(ReportError::Validation(errors)) => {
            Html(render_report_form(&files, &form, &errors, None)).into_response()
        }
        Err(ReportError::FileNotFound(_)) => {
            let field_error = FieldError::new("selected_file", "unknown file selection");
            Html(render_report_form(&files, &form, &[field_error], None)).into_response()
        }
        Err(ReportError::Send(e)) => {
            error!(error = %e, "Failed to send report");
            Html(render_report_form(
                &files,
                &form,
                &[],
                Some("The report could not be sent. Please try again."),
            ))
            .into_response()
        }
        Err(e) => {
            error!(error = %e, "Failed to send report");
            internal_error_page()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(filename: &str, description: &str) -> FileRecord {
        FileRecord {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            filename: filename.to_string(),
            blob_path: format!("uploads/{filename}"),
            description: description.to_string(),
            uploaded_at: Utc::now(),
        }
    }

    #[test]
    fn test_render_list_escapes_user_content() {
        let page = render_list(&[record("<script>.txt", "a & b")]);
        assert!(page.contains("&lt;script&gt;.txt"));
        assert!(page.contains("a &amp; b"));
        assert!(!page.contains("<script>.txt"));
    }

    #[test]
    fn test_render_upload_form_shows_errors() {
        let errors = vec![FieldError::new("description", "too long")];
        let page = render_upload_form("a description", &errors);
        assert!(page.contains("too long"));
        assert!(page.contains("a description"));
    }

    #[test]
    fn test_render_report_form_lists_files() {
        let files = vec![record("numbers.csv", "")];
        let page = render_report_form(&files, &ReportForm::default(), &[], None);
        assert!(page.contains("numbers.csv"));
        assert!(page.contains("No attachment"));
    }

    #[test]
    fn test_report_form_selected_file_parsing() {
        let mut form = ReportForm::default();
        assert_eq!(form.selected_file_id().unwrap(), None);

        let id = Uuid::new_v4();
        form.selected_file = id.to_string();
        assert_eq!(form.selected_file_id().unwrap(), Some(id));

        form.selected_file = "garbage".to_string();
        assert!(form.selected_file_id().is_err());
    }
}
