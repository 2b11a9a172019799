//! Shared types, errors, and configuration for Filedepot.
//!
//! This crate provides common building blocks used across all other crates:
//! - Application-wide error types
//! - Configuration management
//! - SMTP email delivery
//! - JWT token handling

pub mod auth;
pub mod config;
pub mod email;
pub mod error;
pub mod jwt;

pub use auth::Claims;
pub use config::{AppConfig, EmailConfig};
pub use email::{EmailAttachment, EmailError, EmailService};
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
