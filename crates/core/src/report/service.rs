//! Report service implementation.

use std::sync::Arc;

use uuid::Uuid;
use validator::ValidateEmail;

use super::error::ReportError;
use crate::files::{FieldError, FileError, FileRepository};
use crate::notify::Mailer;
use crate::storage::BlobStore;
use filedepot_shared::EmailAttachment;

/// Maximum length of a report subject.
pub const MAX_SUBJECT_LEN: usize = 100;

/// Input for sending a report.
#[derive(Debug, Clone)]
pub struct ReportInput {
    /// The authenticated sender.
    pub owner_id: Uuid,
    /// Recipient address, chosen by the caller.
    pub to_email: String,
    /// Subject line.
    pub subject: String,
    /// Message body.
    pub message: String,
    /// One of the sender's own files to attach, if any.
    pub selected_file: Option<Uuid>,
}

/// Validate report fields, collecting every field error.
fn validate_report(input: &ReportInput) -> Vec<FieldError> {
    let mut errors = Vec::new();

    if !input.to_email.validate_email() {
        errors.push(FieldError::new("to_email", "a valid email address is required"));
    }
    if input.subject.trim().is_empty() {
        errors.push(FieldError::new("subject", "a subject is required"));
    } else if input.subject.chars().count() > MAX_SUBJECT_LEN {
        errors.push(FieldError::new(
            "subject",
            format!("subject must be at most {MAX_SUBJECT_LEN} characters"),
        ));
    }
    if input.message.trim().is_empty() {
        errors.push(FieldError::new("message", "a message is required"));
    }

    errors
}

/// Service sending user-composed reports with optional file attachments.
pub struct ReportService<R: FileRepository, M: Mailer> {
    repo: Arc<R>,
    storage: Arc<BlobStore>,
    mailer: Arc<M>,
}

impl<R: FileRepository, M: Mailer> ReportService<R, M> {
    /// Create a new report service.
    #[must_use]
    pub fn new(repo: Arc<R>, storage: Arc<BlobStore>, mailer: Arc<M>) -> Self {
        Self {
            repo,
            storage,
            mailer,
        }
    }

    /// Send a report email.
    ///
    /// The selected file is resolved scoped to the sender; picking someone
    /// else's file id is indistinguishable from a missing one. A blob that
    /// has vanished from storage is skipped, not an error.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Validation` on bad input,
    /// `ReportError::FileNotFound` for a missing/foreign attachment id, and
    /// `ReportError::Send` when the transport fails. The caller decides how
    /// to surface the send failure.
    pub async fn send(&self, input: ReportInput) -> Result<(), ReportError> {
        let errors = validate_report(&input);
        if !errors.is_empty() {
            return Err(ReportError::Validation(errors));
        }

        let attachment = match input.selected_file {
            Some(file_id) => self.load_attachment(file_id, input.owner_id).await?,
            None => None,
        };

        self.mailer
            .send(&input.to_email, &input.subject, &input.message, attachment)
            .await
            .map_err(|e| ReportError::Send(e.to_string()))?;

        Ok(())
    }

    async fn load_attachment(
        &self,
        file_id: Uuid,
        owner_id: Uuid,
    ) -> Result<Option<EmailAttachment>, ReportError> {
        let record = self
            .repo
            .find_by_id(file_id, owner_id)
            .await
            .map_err(|e| match e {
                FileError::Repository(msg) => ReportError::Repository(msg),
                other => ReportError::Repository(other.to_string()),
            })?
            .ok_or(ReportError::FileNotFound(file_id))?;

        if !self.storage.exists(&record.blob_path).await {
            return Ok(None);
        }

        let content = self.storage.read(&record.blob_path).await?;
        Ok(Some(EmailAttachment {
            filename: record.filename,
            content_type: "application/octet-stream".to_string(),
            content,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::files::{CreateRecordInput, FileRecord, UpdateRecordInput};
    use crate::storage::{StorageConfig, StorageProvider};
    use chrono::Utc;
    use filedepot_shared::EmailError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockFileRepository {
        records: Mutex<HashMap<Uuid, FileRecord>>,
    }

    impl MockFileRepository {
        fn insert(&self, record: FileRecord) {
            self.records.lock().unwrap().insert(record.id, record);
        }
    }

    impl FileRepository for MockFileRepository {
        async fn create(&self, input: CreateRecordInput) -> Result<FileRecord, FileError> {
            let record = FileRecord {
                id: input.id,
                owner_id: input.owner_id,
                filename: input.filename,
                blob_path: input.blob_path,
                description: input.description,
                uploaded_at: Utc::now(),
            };
            self.insert(record.clone());
            Ok(record)
        }

        async fn find_by_id(
            &self,
            id: Uuid,
            owner_id: Uuid,
        ) -> Result<Option<FileRecord>, FileError> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .get(&id)
                .filter(|r| r.owner_id == owner_id)
                .cloned())
        }

        async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<FileRecord>, FileError> {
            Ok(self
                .records
                .lock()
                .unwrap()
                .values()
                .filter(|r| r.owner_id == owner_id)
                .cloned()
                .collect())
        }

        async fn update(
            &self,
            id: Uuid,
            _owner_id: Uuid,
            _input: UpdateRecordInput,
        ) -> Result<FileRecord, FileError> {
            Err(FileError::not_found(id))
        }

        async fn delete(&self, _id: Uuid, _owner_id: Uuid) -> Result<bool, FileError> {
            Ok(false)
        }
    }

    struct SentMail {
        to: String,
        subject: String,
        attachment: Option<EmailAttachment>,
    }

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<SentMail>>,
    }

    impl Mailer for RecordingMailer {
        async fn send(
            &self,
            to: &str,
            subject: &str,
            _body: &str,
            attachment: Option<EmailAttachment>,
        ) -> Result<(), EmailError> {
            self.sent.lock().unwrap().push(SentMail {
                to: to.to_string(),
                subject: subject.to_string(),
                attachment,
            });
            Ok(())
        }
    }

    struct FailingMailer;

    impl Mailer for FailingMailer {
        async fn send(
            &self,
            _to: &str,
            _subject: &str,
            _body: &str,
            _attachment: Option<EmailAttachment>,
        ) -> Result<(), EmailError> {
            Err(EmailError::SendError("connection reset".to_string()))
        }
    }

    fn temp_store() -> (tempfile::TempDir, Arc<BlobStore>) {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let config = StorageConfig::new(StorageProvider::local_fs(dir.path()));
        let store = Arc::new(BlobStore::from_config(config).expect("should create store"));
        (dir, store)
    }

    fn stored_record(owner_id: Uuid, blob_path: &str) -> FileRecord {
        FileRecord {
            id: Uuid::new_v4(),
            owner_id,
            filename: "numbers.csv".to_string(),
            blob_path: blob_path.to_string(),
            description: String::new(),
            uploaded_at: Utc::now(),
        }
    }

    fn report_input(owner_id: Uuid) -> ReportInput {
        ReportInput {
            owner_id,
            to_email: "boss@example.com".to_string(),
            subject: "Weekly report".to_string(),
            message: "All numbers attached.".to_string(),
            selected_file: None,
        }
    }

    #[tokio::test]
    async fn test_send_without_attachment() {
        let (_dir, storage) = temp_store();
        let repo = Arc::new(MockFileRepository::default());
        let mailer = Arc::new(RecordingMailer::default());
        let service = ReportService::new(repo, storage, mailer.clone());

        service
            .send(report_input(Uuid::new_v4()))
            .await
            .expect("send should succeed");

        let sent = mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, "boss@example.com");
        assert_eq!(sent[0].subject, "Weekly report");
        assert!(sent[0].attachment.is_none());
    }

    #[tokio::test]
    async fn test_send_attaches_own_file() {
        let (_dir, storage) = temp_store();
        let owner = Uuid::new_v4();
        storage
            .write("uploads/o/r/numbers.csv", b"1,2,3".to_vec())
            .await
            .expect("write");

        let repo = Arc::new(MockFileRepository::default());
        let record = stored_record(owner, "uploads/o/r/numbers.csv");
        repo.insert(record.clone());

        let mailer = Arc::new(RecordingMailer::default());
        let service = ReportService::new(repo, storage, mailer.clone());

        let mut input = report_input(owner);
        input.selected_file = Some(record.id);
        service.send(input).await.expect("send should succeed");

        let sent = mailer.sent.lock().unwrap();
        let attachment = sent[0].attachment.as_ref().expect("attachment expected");
        assert_eq!(attachment.filename, "numbers.csv");
        assert_eq!(attachment.content, b"1,2,3");
    }

    #[tokio::test]
    async fn test_send_rejects_foreign_file() {
        let (_dir, storage) = temp_store();
        let repo = Arc::new(MockFileRepository::default());
        let record = stored_record(Uuid::new_v4(), "uploads/other");
        repo.insert(record.clone());

        let mailer = Arc::new(RecordingMailer::default());
        let service = ReportService::new(repo, storage, mailer.clone());

        let mut input = report_input(Uuid::new_v4());
        input.selected_file = Some(record.id);

        let result = service.send(input).await;
        assert!(matches!(result, Err(ReportError::FileNotFound(_))));
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_send_skips_missing_blob() {
        let (_dir, storage) = temp_store();
        let owner = Uuid::new_v4();
        let repo = Arc::new(MockFileRepository::default());
        let record = stored_record(owner, "uploads/vanished");
        repo.insert(record.clone());

        let mailer = Arc::new(RecordingMailer::default());
        let service = ReportService::new(repo, storage, mailer.clone());

        let mut input = report_input(owner);
        input.selected_file = Some(record.id);
        service.send(input).await.expect("send should succeed");

        assert!(mailer.sent.lock().unwrap()[0].attachment.is_none());
    }

    #[tokio::test]
    async fn test_transport_failure_is_visible() {
        let (_dir, storage) = temp_store();
        let repo = Arc::new(MockFileRepository::default());
        let service = ReportService::new(repo, storage, Arc::new(FailingMailer));

        let result = service.send(report_input(Uuid::new_v4())).await;
        assert!(matches!(result, Err(ReportError::Send(_))));
    }

    #[tokio::test]
    async fn test_validation_collects_all_field_errors() {
        let (_dir, storage) = temp_store();
        let repo = Arc::new(MockFileRepository::default());
        let mailer = Arc::new(RecordingMailer::default());
        let service = ReportService::new(repo, storage, mailer.clone());

        let input = ReportInput {
            owner_id: Uuid::new_v4(),
            to_email: "not-an-address".to_string(),
            subject: String::new(),
            message: " ".to_string(),
            selected_file: None,
        };

        match service.send(input).await {
            Err(ReportError::Validation(errors)) => {
                let fields: Vec<&str> = errors.iter().map(|e| e.field).collect();
                assert_eq!(fields, vec!["to_email", "subject", "message"]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
        assert!(mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_validation_rejects_long_subject() {
        let (_dir, storage) = temp_store();
        let repo = Arc::new(MockFileRepository::default());
        let service = ReportService::new(repo, storage, Arc::new(RecordingMailer::default()));

        let mut input = report_input(Uuid::new_v4());
        input.subject = "s".repeat(MAX_SUBJECT_LEN + 1);

        let result = service.send(input).await;
        assert!(matches!(result, Err(ReportError::Validation(_))));
    }
}
