//! Outbound adapters implementing the driven ports.

pub mod blobstore;
pub mod notify;
pub mod persistence;
