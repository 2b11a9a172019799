//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - The REST resource routes for stored files
//! - The form-style routes (upload / replace / delete / report flows)
//! - Profile and status pages
//! - Authentication middleware

pub mod middleware;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use filedepot_core::storage::BlobStore;
use filedepot_shared::{EmailService, JwtService};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token validation.
    pub jwt_service: Arc<JwtService>,
    /// Email service for notifications and reports.
    pub email_service: Arc<EmailService>,
    /// Blob store for uploaded file content.
    pub storage: Arc<BlobStore>,
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(routes::app_routes(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
