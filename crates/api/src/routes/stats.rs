//! Profile and status pages.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tracing::error;

use super::html::{escape, layout};
use super::stats_service;
use crate::{AppState, middleware::AuthUser};
use filedepot_core::stats::{ProfileStats, SystemStatus};
use filedepot_db::repositories::UserRepository;

/// Creates the profile and status routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(profile_page))
        .route("/status", get(status_page))
}

fn render_profile(display_name: &str, stats: &ProfileStats) -> String {
    let last_activity = stats
        .last_activity
        .map_or_else(|| "never".to_string(), |t| t.format("%Y-%m-%d %H:%M").to_string());

    let recent: String = stats
        .recent_files
        .iter()
        .map(|f| {
            format!(
                "<li>{filename} ({uploaded_at})</li>",
                filename = escape(&f.filename),
                uploaded_at = f.uploaded_at.format("%Y-%m-%d %H:%M"),
            )
        })
        .collect();

    layout(
        "Profile",
        &format!(
            r"<p>Signed in as {display_name}</p>
<p>Total files: {total_files}</p>
<p>Last activity: {last_activity}</p>
<h2>Recent files</h2>
<ul>{recent}</ul>",
            display_name = escape(display_name),
            total_files = stats.total_files,
        ),
    )
}

fn render_status(status: &SystemStatus) -> String {
    layout(
        "Status",
        &format!(
            r"<p>Registered users: {total_users}</p>
<p>Total stored data: {total_blob_size_mb} MB</p>
<p>Email notifications: {email_status}</p>",
            total_users = status.total_users,
            total_blob_size_mb = status.total_blob_size_mb,
            email_status = if status.email_configured {
                "configured"
            } else {
                "not configured"
            },
        ),
    )
}

/// GET `/profile` - per-user statistics.
async fn profile_page(State(state): State<AppState>, auth: AuthUser) -> Response {
    let users = UserRepository::new((*state.db).clone());
    let display_name = match users.find_by_id(auth.user_id()).await {
        Ok(Some(user)) => user.display_name,
        Ok(None) => auth.email().to_string(),
        Err(e) => {
            error!(error = %e, "Failed to load user for profile");
            auth.email().to_string()
        }
    };

    let service = stats_service(&state);

    match service.profile_stats(auth.user_id()).await {
        Ok(stats) => Html(render_profile(&display_name, &stats)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to compute profile stats");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(layout("Error", "<p>Something went wrong.</p>")),
            )
                .into_response()
        }
    }
}

/// GET `/status` - sitewide statistics.
async fn status_page(State(state): State<AppState>) -> Response {
    let service = stats_service(&state);

    match service.system_status().await {
        Ok(status) => Html(render_status(&status)).into_response(),
        Err(e) => {
            error!(error = %e, "Failed to compute system status");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(layout("Error", "<p>Something went wrong.</p>")),
            )
                .into_response()
        }
    }
}
