//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// JWT configuration.
    pub jwt: JwtSettings,
    /// Email configuration.
    #[serde(default)]
    pub email: EmailConfig,
    /// Blob storage configuration.
    #[serde(default)]
    pub storage: StorageSettings,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// JWT configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct JwtSettings {
    /// Secret key for signing tokens.
    pub secret: String,
    /// Access token expiration in seconds.
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry_secs: u64,
}

fn default_access_token_expiry() -> u64 {
    900 // 15 minutes
}

/// Email (SMTP) configuration.
///
/// Mutations of stored files are announced to `ops_mailbox`; the SMTP
/// settings describe the transport used for every outgoing message.
#[derive(Debug, Clone, Deserialize)]
pub struct EmailConfig {
    /// SMTP server hostname.
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    /// SMTP server port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// SMTP username.
    #[serde(default)]
    pub smtp_username: String,
    /// SMTP password.
    #[serde(default)]
    pub smtp_password: String,
    /// Sender address for outgoing mail.
    #[serde(default = "default_from_email")]
    pub from_email: String,
    /// Sender display name.
    #[serde(default = "default_from_name")]
    pub from_name: String,
    /// Fixed operations mailbox notified on every file mutation.
    #[serde(default = "default_ops_mailbox")]
    pub ops_mailbox: String,
}

fn default_smtp_host() -> String {
    "localhost".to_string()
}

fn default_smtp_port() -> u16 {
    1025
}

fn default_from_email() -> String {
    "noreply@filedepot.local".to_string()
}

fn default_from_name() -> String {
    "Filedepot".to_string()
}

fn default_ops_mailbox() -> String {
    "ops@filedepot.local".to_string()
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: default_smtp_host(),
            smtp_port: default_smtp_port(),
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: default_from_email(),
            from_name: default_from_name(),
            ops_mailbox: default_ops_mailbox(),
        }
    }
}

impl EmailConfig {
    /// Whether the mail transport is fully configured.
    ///
    /// True only when host, port, username, and password are all present.
    /// This is a configuration-presence check, not a connectivity check.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.smtp_host.is_empty()
            && self.smtp_port != 0
            && !self.smtp_username.is_empty()
            && !self.smtp_password.is_empty()
    }
}

/// Blob storage configuration section.
#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    /// Storage backend: "local" or "s3".
    #[serde(default = "default_storage_backend")]
    pub backend: String,
    /// Root directory for the local backend.
    #[serde(default = "default_storage_root")]
    pub root: String,
    /// S3 endpoint URL.
    #[serde(default)]
    pub endpoint: String,
    /// S3 bucket name.
    #[serde(default)]
    pub bucket: String,
    /// S3 access key id.
    #[serde(default)]
    pub access_key_id: String,
    /// S3 secret access key.
    #[serde(default)]
    pub secret_access_key: String,
    /// S3 region.
    #[serde(default)]
    pub region: String,
    /// Maximum upload size in bytes.
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

fn default_storage_backend() -> String {
    "local".to_string()
}

fn default_storage_root() -> String {
    "./media".to_string()
}

fn default_max_file_size() -> u64 {
    10 * 1024 * 1024
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: default_storage_backend(),
            root: default_storage_root(),
            endpoint: String::new(),
            bucket: String::new(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            region: String::new(),
            max_file_size: default_max_file_size(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("FILEDEPOT").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_config_defaults() {
        let config = EmailConfig::default();
        assert_eq!(config.smtp_host, "localhost");
        assert_eq!(config.smtp_port, 1025);
        assert_eq!(config.ops_mailbox, "ops@filedepot.local");
    }

    #[test]
    fn test_email_not_configured_without_credentials() {
        let config = EmailConfig::default();
        assert!(!config.is_configured());
    }

    #[test]
    fn test_email_configured_with_all_settings() {
        let config = EmailConfig {
            smtp_username: "mailer".to_string(),
            smtp_password: "secret".to_string(),
            ..EmailConfig::default()
        };
        assert!(config.is_configured());
    }

    #[test]
    fn test_email_not_configured_with_zero_port() {
        let config = EmailConfig {
            smtp_port: 0,
            smtp_username: "mailer".to_string(),
            smtp_password: "secret".to_string(),
            ..EmailConfig::default()
        };
        assert!(!config.is_configured());
    }

    #[test]
    fn test_storage_settings_defaults() {
        let settings = StorageSettings::default();
        assert_eq!(settings.backend, "local");
        assert_eq!(settings.root, "./media");
        assert_eq!(settings.max_file_size, 10 * 1024 * 1024);
    }

    #[test]
    fn test_config_from_environment() {
        temp_env::with_vars(
            [
                ("FILEDEPOT__DATABASE__URL", Some("postgres://localhost/filedepot_test")),
                ("FILEDEPOT__JWT__SECRET", Some("test-secret")),
                ("FILEDEPOT__SERVER__PORT", Some("9090")),
                ("FILEDEPOT__EMAIL__OPS_MAILBOX", Some("alerts@example.com")),
            ],
            || {
                let config = AppConfig::load().expect("config should load from env");
                assert_eq!(config.server.port, 9090);
                assert_eq!(config.database.url, "postgres://localhost/filedepot_test");
                assert_eq!(config.email.ops_mailbox, "alerts@example.com");
            },
        );
    }
}
