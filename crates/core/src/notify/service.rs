//! Notifier implementation.

use std::sync::Arc;

use thiserror::Error;
use tracing::error;

use filedepot_shared::{EmailAttachment, EmailError, EmailService};

use super::types::FileEvent;
use crate::files::FileRecord;
use crate::storage::{BlobStore, StorageError};

/// Mail transport seam.
///
/// Implemented for the shared [`EmailService`]; tests substitute recording
/// or failing mailers.
pub trait Mailer: Send + Sync {
    /// Send one message, optionally carrying an attachment.
    fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        attachment: Option<EmailAttachment>,
    ) -> impl std::future::Future<Output = Result<(), EmailError>> + Send;
}

impl Mailer for EmailService {
    async fn send(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        attachment: Option<EmailAttachment>,
    ) -> Result<(), EmailError> {
        self.send_with_attachment(to, subject, body, attachment)
            .await
    }
}

/// Lifecycle notification seam consumed by the file service.
pub trait Notifier: Send + Sync {
    /// Announce a lifecycle event. Must not fail; implementations catch and
    /// log their own errors.
    fn file_event(
        &self,
        record: &FileRecord,
        event: FileEvent,
    ) -> impl std::future::Future<Output = ()> + Send;
}

#[derive(Debug, Error)]
enum NotifyError {
    #[error(transparent)]
    Email(#[from] EmailError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Notifier announcing file lifecycle events to a fixed operations mailbox.
pub struct EmailNotifier<M: Mailer> {
    mailer: M,
    storage: Arc<BlobStore>,
    recipient: String,
}

impl<M: Mailer> EmailNotifier<M> {
    /// Create a new notifier.
    #[must_use]
    pub fn new(mailer: M, storage: Arc<BlobStore>, recipient: impl Into<String>) -> Self {
        Self {
            mailer,
            storage,
            recipient: recipient.into(),
        }
    }

    fn compose_subject(record: &FileRecord, event: &FileEvent) -> String {
        format!("File {}: {}", event.action(), record.filename)
    }

    fn compose_body(record: &FileRecord, event: &FileEvent) -> String {
        let mut body = format!(
            "Stored at: {}\nDescription: {}\n",
            record.blob_path, record.description
        );
        if let FileEvent::Replaced { previous_filename } = event {
            body.push_str(&format!("Replaces: {previous_filename}\n"));
        }
        body
    }

    /// Load the current blob as an attachment, or `None` if it is missing.
    async fn load_attachment(
        &self,
        record: &FileRecord,
    ) -> Result<Option<EmailAttachment>, NotifyError> {
        if !self.storage.exists(&record.blob_path).await {
            return Ok(None);
        }

        let content = self.storage.read(&record.blob_path).await?;
        Ok(Some(EmailAttachment {
            filename: record.filename.clone(),
            content_type: "application/octet-stream".to_string(),
            content,
        }))
    }

    async fn send_event(&self, record: &FileRecord, event: &FileEvent) -> Result<(), NotifyError> {
        let subject = Self::compose_subject(record, event);
        let body = Self::compose_body(record, event);

        let attachment = if event.wants_attachment() {
            self.load_attachment(record).await?
        } else {
            None
        };

        self.mailer
            .send(&self.recipient, &subject, &body, attachment)
            .await?;

        Ok(())
    }
}

impl<M: Mailer> Notifier for EmailNotifier<M> {
    async fn file_event(&self, record: &FileRecord, event: FileEvent) {
        if let Err(e) = self.send_event(record, &event).await {
            error!(
                action = event.action(),
                filename = %record.filename,
                error = %e,
                "file notification failed"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{StorageConfig, StorageProvider};
    use chrono::Utc;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct SentMail {
        to: String,
        subject: String,
        body: String,
        attachment: Option<EmailAttachment>,
    }

    /// Mailer that records every send.
    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<SentMail>>,
    }

    impl Mailer for RecordingMailer {
        async fn send(
            &self,
            to: &str,
            subject: &str,
            body: &str,
            attachment: Option<EmailAttachment>,
        ) -> Result<(), EmailError> {
            self.sent.lock().unwrap().push(SentMail {
                to: to.to_string(),
                subject: subject.to_string(),
                body: body.to_string(),
                attachment,
            });
            Ok(())
        }
    }

    /// Mailer that always fails.
    struct FailingMailer;

    impl Mailer for FailingMailer {
        async fn send(
            &self,
            _to: &str,
            _subject: &str,
            _body: &str,
            _attachment: Option<EmailAttachment>,
        ) -> Result<(), EmailError> {
            Err(EmailError::SendError("SMTP connection refused".to_string()))
        }
    }

    fn temp_store() -> (tempfile::TempDir, Arc<BlobStore>) {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let config = StorageConfig::new(StorageProvider::local_fs(dir.path()));
        let store = Arc::new(BlobStore::from_config(config).expect("should create store"));
        (dir, store)
    }

    fn record(blob_path: &str) -> FileRecord {
        FileRecord {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            filename: "report.txt".to_string(),
            blob_path: blob_path.to_string(),
            description: "quarterly numbers".to_string(),
            uploaded_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_created_event_attaches_existing_blob() {
        let (_dir, storage) = temp_store();
        storage
            .write("uploads/r/report.txt", b"numbers".to_vec())
            .await
            .expect("write");

        let notifier = EmailNotifier::new(RecordingMailer::default(), storage, "ops@example.com");
        notifier
            .file_event(&record("uploads/r/report.txt"), FileEvent::Created)
            .await;

        let sent = notifier.mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "ops@example.com");
        assert_eq!(sent[0].subject, "File created: report.txt");
        assert!(sent[0].body.contains("uploads/r/report.txt"));
        assert!(sent[0].body.contains("quarterly numbers"));

        let attachment = sent[0].attachment.as_ref().expect("attachment expected");
        assert_eq!(attachment.filename, "report.txt");
        assert_eq!(attachment.content, b"numbers");
    }

    #[tokio::test]
    async fn test_missing_blob_sends_without_attachment() {
        let (_dir, storage) = temp_store();

        let notifier = EmailNotifier::new(RecordingMailer::default(), storage, "ops@example.com");
        notifier
            .file_event(&record("uploads/gone"), FileEvent::Created)
            .await;

        let sent = notifier.mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert!(sent[0].attachment.is_none());
    }

    #[tokio::test]
    async fn test_deleted_event_never_reads_storage() {
        let (_dir, storage) = temp_store();
        storage
            .write("uploads/r/report.txt", b"numbers".to_vec())
            .await
            .expect("write");

        let notifier = EmailNotifier::new(RecordingMailer::default(), storage, "ops@example.com");
        notifier
            .file_event(&record("uploads/r/report.txt"), FileEvent::Deleted)
            .await;

        let sent = notifier.mailer.sent.lock().unwrap();
        assert_eq!(sent[0].subject, "File deleted: report.txt");
        assert!(sent[0].attachment.is_none());
    }

    #[tokio::test]
    async fn test_replaced_event_mentions_previous_filename() {
        let (_dir, storage) = temp_store();

        let notifier = EmailNotifier::new(RecordingMailer::default(), storage, "ops@example.com");
        notifier
            .file_event(
                &record("uploads/new"),
                FileEvent::Replaced {
                    previous_filename: "old.txt".to_string(),
                },
            )
            .await;

        let sent = notifier.mailer.sent.lock().unwrap();
        assert_eq!(sent[0].subject, "File replaced: report.txt");
        assert!(sent[0].body.contains("Replaces: old.txt"));
    }

    #[tokio::test]
    async fn test_transport_failure_is_swallowed() {
        let (_dir, storage) = temp_store();

        let notifier = EmailNotifier::new(FailingMailer, storage, "ops@example.com");
        // Must complete without propagating the transport error.
        notifier
            .file_event(&record("uploads/gone"), FileEvent::Created)
            .await;
    }
}
