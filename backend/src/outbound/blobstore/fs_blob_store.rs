//! Filesystem blob store sandboxed with `cap-std`.
//!
//! Blob keys are slash-separated paths relative to the store root. The
//! root is opened once as a capability, so no operation can address
//! anything outside it. Filesystem calls run on the blocking pool.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::Dir;

use crate::domain::ports::{BlobStore, BlobStoreError};

/// Blob store writing each blob as a file under a sandboxed root
/// directory.
#[derive(Clone)]
pub struct FsBlobStore {
    root: Arc<Dir>,
}

impl FsBlobStore {
    /// Open (creating if necessary) the store rooted at `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, BlobStoreError> {
        let path = path.as_ref();
        Dir::create_ambient_dir_all(path, ambient_authority()).map_err(map_io_error)?;
        let root = Dir::open_ambient_dir(path, ambient_authority()).map_err(map_io_error)?;
        Ok(Self {
            root: Arc::new(root),
        })
    }

    async fn run_blocking<T, F>(&self, op: F) -> Result<T, BlobStoreError>
    where
        T: Send + 'static,
        F: FnOnce(&Dir) -> Result<T, BlobStoreError> + Send + 'static,
    {
        let root = Arc::clone(&self.root);
        tokio::task::spawn_blocking(move || op(&root))
            .await
            .map_err(|err| BlobStoreError::io(format!("blocking task failed: {err}")))?
    }
}

fn map_io_error(error: std::io::Error) -> BlobStoreError {
    BlobStoreError::io(error.to_string())
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), BlobStoreError> {
        let key = key.to_owned();
        let bytes = bytes.to_vec();
        self.run_blocking(move |root| {
            if let Some((parent, _)) = key.rsplit_once('/') {
                root.create_dir_all(parent).map_err(map_io_error)?;
            }
            root.write(&key, &bytes).map_err(map_io_error)
        })
        .await
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, BlobStoreError> {
        let key = key.to_owned();
        self.run_blocking(move |root| match root.read(&key) {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(BlobStoreError::not_found(key)),
            Err(err) => Err(map_io_error(err)),
        })
        .await
    }

    async fn delete(&self, key: &str) -> Result<(), BlobStoreError> {
        let key = key.to_owned();
        self.run_blocking(move |root| match root.remove_file(&key) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(map_io_error(err)),
        })
        .await
    }
}
