//! Blob storage adapters.

pub mod fs_blob_store;

pub use fs_blob_store::FsBlobStore;
