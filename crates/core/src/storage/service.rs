//! Blob store implementation using Apache OpenDAL.

use opendal::{ErrorKind, Operator, services};
use uuid::Uuid;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// Blob store for uploaded file content.
///
/// Owns the raw bytes of every uploaded file, addressed by a storage key.
/// The database keeps a `blob_path` pointing here; a key with no blob behind
/// it is tolerated by callers (treated as size 0, skipped on attach).
pub struct BlobStore {
    operator: Operator,
    config: StorageConfig,
}

impl BlobStore {
    /// Create a new blob store from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::S3 {
                endpoint,
                bucket,
                access_key_id,
                secret_access_key,
                region,
            } => {
                let builder = services::S3::default()
                    .endpoint(endpoint)
                    .bucket(bucket)
                    .access_key_id(access_key_id)
                    .secret_access_key(secret_access_key)
                    .region(region);

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish()
                    .pipe(Ok)
            }
        }
    }

    /// Generate the storage key for a new blob.
    ///
    /// Format: `uploads/{owner_id}/{record_id}/{blob_id}-{sanitized_filename}`.
    /// A fresh blob id goes into every key, so a replaced record always gets
    /// a key distinct from the one it had before.
    #[must_use]
    pub fn generate_key(owner_id: Uuid, record_id: Uuid, filename: &str) -> String {
        let sanitized = sanitize_filename(filename);
        let blob_id = Uuid::new_v4();

        format!("uploads/{owner_id}/{record_id}/{blob_id}-{sanitized}")
    }

    /// Write a blob.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::FileTooLarge` if the content exceeds the
    /// configured maximum, or an operation error if the write fails.
    pub async fn write(&self, key: &str, content: Vec<u8>) -> Result<(), StorageError> {
        let size = content.len() as u64;
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(size, self.config.max_file_size));
        }

        self.operator
            .write(key, content)
            .await
            .map_err(StorageError::from)?;

        Ok(())
    }

    /// Read a blob's content.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no blob exists at `key`.
    pub async fn read(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let buffer = self.operator.read(key).await.map_err(StorageError::from)?;
        Ok(buffer.to_vec())
    }

    /// Check if a blob exists.
    pub async fn exists(&self, key: &str) -> bool {
        match self.operator.stat(key).await {
            Ok(_) => true,
            Err(e) if e.kind() == ErrorKind::NotFound => false,
            Err(_) => false,
        }
    }

    /// Get a blob's size in bytes, or `None` if it is missing.
    pub async fn size(&self, key: &str) -> Option<u64> {
        match self.operator.stat(key).await {
            Ok(meta) => Some(meta.content_length()),
            Err(_) => None,
        }
    }

    /// Delete a blob. Deleting a missing blob is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying delete operation fails.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        match self.operator.delete(key).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::from(e)),
        }
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

/// Sanitize filename for use inside a storage key.
///
/// Only allows ASCII alphanumeric characters, dots, hyphens, and underscores.
fn sanitize_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Extension trait for pipe operator.
trait Pipe: Sized {
    fn pipe<F, R>(self, f: F) -> R
    where
        F: FnOnce(Self) -> R,
    {
        f(self)
    }
}

impl<T> Pipe for T {}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, BlobStore) {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let config = StorageConfig::new(StorageProvider::local_fs(dir.path()));
        let store = BlobStore::from_config(config).expect("should create store");
        (dir, store)
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("invoice.pdf"), "invoice.pdf");
        assert_eq!(sanitize_filename("my file (1).pdf"), "my_file__1_.pdf");
        assert_eq!(sanitize_filename("test@#$%.doc"), "test____.doc");
    }

    #[test]
    fn test_generate_key_shape() {
        let owner = Uuid::parse_str("550e8400-e29b-41d4-a716-446655440000").expect("valid uuid");
        let record = Uuid::parse_str("6ba7b810-9dad-11d1-80b4-00c04fd430c8").expect("valid uuid");

        let key = BlobStore::generate_key(owner, record, "report.txt");
        assert!(key.starts_with("uploads/"));
        assert!(key.contains(&owner.to_string()));
        assert!(key.contains(&record.to_string()));
        assert!(key.ends_with("report.txt"));
    }

    #[test]
    fn test_generate_key_unique_per_call() {
        let owner = Uuid::new_v4();
        let record = Uuid::new_v4();

        let first = BlobStore::generate_key(owner, record, "a.txt");
        let second = BlobStore::generate_key(owner, record, "a.txt");
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_write_read_round_trip() {
        let (_dir, store) = temp_store();

        store
            .write("uploads/a/b/c-file.txt", b"hello".to_vec())
            .await
            .expect("write should succeed");

        let content = store.read("uploads/a/b/c-file.txt").await.expect("read");
        assert_eq!(content, b"hello");
        assert!(store.exists("uploads/a/b/c-file.txt").await);
        assert_eq!(store.size("uploads/a/b/c-file.txt").await, Some(5));
    }

    #[tokio::test]
    async fn test_missing_blob_is_absent_not_an_error() {
        let (_dir, store) = temp_store();

        assert!(!store.exists("uploads/nope").await);
        assert_eq!(store.size("uploads/nope").await, None);
        assert!(store.delete("uploads/nope").await.is_ok());
    }

    #[tokio::test]
    async fn test_delete_removes_blob() {
        let (_dir, store) = temp_store();

        store
            .write("uploads/x", b"bytes".to_vec())
            .await
            .expect("write");
        store.delete("uploads/x").await.expect("delete");
        assert!(!store.exists("uploads/x").await);
    }

    #[tokio::test]
    async fn test_write_rejects_oversized_content() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let config =
            StorageConfig::new(StorageProvider::local_fs(dir.path())).with_max_file_size(8);
        let store = BlobStore::from_config(config).expect("should create store");

        let err = store
            .write("uploads/too-big", vec![0u8; 16])
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::FileTooLarge { .. }));
        assert!(!store.exists("uploads/too-big").await);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        // Sanitized filenames contain only key-safe characters and keep
        // their length.
        #[test]
        fn prop_sanitize_output_is_key_safe(filename in ".{0,64}") {
            let sanitized = sanitize_filename(&filename);
            prop_assert_eq!(sanitized.chars().count(), filename.chars().count());
            prop_assert!(
                sanitized
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_')
            );
        }

        // Already-safe names pass through untouched.
        #[test]
        fn prop_sanitize_is_identity_on_safe_names(filename in "[A-Za-z0-9._-]{1,64}") {
            prop_assert_eq!(sanitize_filename(&filename), filename);
        }
    }
}
