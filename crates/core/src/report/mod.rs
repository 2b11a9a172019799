//! User-composed report emails.
//!
//! Lets an authenticated user send an arbitrary message to a recipient of
//! their choosing, optionally attaching one of their own stored files.
//! Unlike lifecycle notifications, a transport failure here is surfaced to
//! the caller.

mod error;
mod service;

pub use error::ReportError;
pub use service::{MAX_SUBJECT_LEN, ReportInput, ReportService};
