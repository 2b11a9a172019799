//! File lifecycle service.
//!
//! Orchestrates the upload / replace / delete / list workflow for stored
//! files: validate input, persist the blob and the database record in
//! order, then fire a best-effort notification. Both the form surface and
//! the REST resource drive this module through the same entry points.

mod error;
mod service;
mod types;

pub use error::FileError;
pub use service::{FileRepository, FileService};
pub use types::{
    CreateRecordInput, FieldError, FileRecord, MAX_DESCRIPTION_LEN, UpdateRecordInput,
    UploadInput, validate_content,
};
