//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) photo_dir: PathBuf,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a server configuration binding to `bind_addr` and storing
    /// photo blobs under `photo_dir`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, photo_dir: impl Into<PathBuf>) -> Self {
        Self {
            bind_addr,
            photo_dir: photo_dir.into(),
            db_pool: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// When provided, the server uses the Diesel-backed repositories;
    /// otherwise every port falls back to its in-memory fixture, which is
    /// only useful for smoke tests.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Return the photo blob store root.
    #[must_use]
    pub fn photo_dir(&self) -> &Path {
        &self.photo_dir
    }
}
