//! Port for photo byte storage.
//!
//! The aggregate never carries raw bytes; adapters store them under an
//! opaque key and hand back a stable reference.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by blob store adapters.
    pub enum BlobStoreError {
        /// Underlying storage failed.
        Io { message: String } =>
            "blob store operation failed: {message}",
        /// No blob exists under the requested key.
        NotFound { key: String } =>
            "no blob stored under key {key}",
    }
}

/// Write/read/delete blob storage keyed by opaque string keys.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any previous content.
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), BlobStoreError>;

    /// Fetch the bytes stored under `key`.
    async fn get(&self, key: &str) -> Result<Vec<u8>, BlobStoreError>;

    /// Remove the blob under `key`; removing a missing key is not an
    /// error because deletion is retried after partial failures.
    async fn delete(&self, key: &str) -> Result<(), BlobStoreError>;
}

/// Fixture implementation: discards writes, never finds anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureBlobStore;

#[async_trait]
impl BlobStore for FixtureBlobStore {
    async fn put(&self, _key: &str, _bytes: &[u8]) -> Result<(), BlobStoreError> {
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, BlobStoreError> {
        Err(BlobStoreError::not_found(key))
    }

    async fn delete(&self, _key: &str) -> Result<(), BlobStoreError> {
        Ok(())
    }
}
