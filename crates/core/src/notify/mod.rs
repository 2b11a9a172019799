//! Best-effort email notifications for file lifecycle events.
//!
//! Every successful upload, replace, and delete is announced to a fixed
//! operations mailbox, attaching the current blob when it still exists.
//! Notification failures are logged and swallowed: the primary mutation has
//! already succeeded and is never undone or reported as failed because the
//! announcement could not be sent.

mod service;
mod types;

pub use service::{EmailNotifier, Mailer, Notifier};
pub use types::FileEvent;
