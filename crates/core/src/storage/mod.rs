//! Blob store for uploaded file content, built on Apache OpenDAL.
//!
//! Vendor-agnostic object storage with support for:
//! - Local filesystem (default)
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3, DigitalOcean Spaces
//!
//! Blobs are addressed by string keys of the form
//! `uploads/{owner_id}/{record_id}/{blob_id}-{sanitized_filename}`.

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::BlobStore;
