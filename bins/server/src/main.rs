//! Filedepot API Server
//!
//! Main entry point for the Filedepot backend service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use filedepot_api::{AppState, create_router};
use filedepot_core::storage::{BlobStore, StorageConfig, StorageProvider};
use filedepot_db::connect;
use filedepot_shared::{AppConfig, EmailService, JwtConfig, JwtService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "filedepot=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!("Connected to database");

    // Create JWT service
    let jwt_config = JwtConfig {
        secret: config.jwt.secret.clone(),
        #[allow(clippy::cast_possible_wrap)]
        access_token_expires_minutes: (config.jwt.access_token_expiry_secs / 60) as i64,
    };
    let jwt_service = JwtService::new(jwt_config);

    // Create email service
    let email_service = EmailService::new(config.email.clone());
    info!(
        smtp_host = %config.email.smtp_host,
        smtp_port = %config.email.smtp_port,
        ops_mailbox = %config.email.ops_mailbox,
        "Email service configured"
    );

    // Create blob store
    let provider = match config.storage.backend.as_str() {
        "s3" => StorageProvider::s3(
            config.storage.endpoint.clone(),
            config.storage.bucket.clone(),
            config.storage.access_key_id.clone(),
            config.storage.secret_access_key.clone(),
            config.storage.region.clone(),
        ),
        _ => StorageProvider::local_fs(config.storage.root.clone()),
    };
    let storage_config =
        StorageConfig::new(provider).with_max_file_size(config.storage.max_file_size);
    let storage = BlobStore::from_config(storage_config).context("Failed to initialize storage")?;
    info!(provider = storage.provider_name(), "Blob store initialized");

    // Create application state
    let state = AppState {
        db: Arc::new(db),
        jwt_service: Arc::new(jwt_service),
        email_service: Arc::new(email_service),
        storage: Arc::new(storage),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
