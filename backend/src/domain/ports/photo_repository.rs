//! Port for photo attachment metadata.
//!
//! Bytes live in the blob store; this port only tracks metadata rows and
//! the per-stage counts the checklist derivation depends on.

use async_trait::async_trait;

use crate::domain::photo::{PhotoAttachment, PhotoId};
use crate::domain::reservation::ReservationId;
use crate::domain::stage::HandoffStage;

use super::define_port_error;

define_port_error! {
    /// Errors raised by photo repository adapters.
    pub enum PhotoRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "photo repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "photo repository query failed: {message}",
    }
}

/// Metadata for a photo about to be inserted; the id is assigned by the
/// store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPhoto {
    /// Owning reservation.
    pub reservation_id: ReservationId,
    /// Owning hand-off stage.
    pub stage: HandoffStage,
    /// Sniffed image MIME type.
    pub content_type: String,
    /// Payload size in bytes.
    pub byte_size: i64,
    /// Hex-encoded SHA-256 of the payload.
    pub checksum: String,
    /// Blob-store key holding the bytes.
    pub blob_key: String,
}

/// Persistence port for photo attachment metadata.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoRepository: Send + Sync {
    /// Insert a metadata row, returning the stored attachment with its
    /// assigned identifier.
    async fn insert(&self, photo: &NewPhoto) -> Result<PhotoAttachment, PhotoRepositoryError>;

    /// Fetch one attachment scoped to its owning (reservation, stage).
    async fn find(
        &self,
        id: ReservationId,
        stage: HandoffStage,
        photo_id: PhotoId,
    ) -> Result<Option<PhotoAttachment>, PhotoRepositoryError>;

    /// Delete a metadata row; `false` when no row existed.
    async fn delete(&self, photo_id: PhotoId) -> Result<bool, PhotoRepositoryError>;

    /// Number of attachments stored for a (reservation, stage) pair.
    async fn count(
        &self,
        id: ReservationId,
        stage: HandoffStage,
    ) -> Result<u32, PhotoRepositoryError>;
}

/// Fixture implementation: empty store that accepts writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixturePhotoRepository;

#[async_trait]
impl PhotoRepository for FixturePhotoRepository {
    async fn insert(&self, photo: &NewPhoto) -> Result<PhotoAttachment, PhotoRepositoryError> {
        Ok(PhotoAttachment {
            id: PhotoId::new(1),
            reservation_id: photo.reservation_id,
            stage: photo.stage,
            content_type: photo.content_type.clone(),
            byte_size: photo.byte_size,
            checksum: photo.checksum.clone(),
            blob_key: photo.blob_key.clone(),
            created_at: chrono::Utc::now(),
        })
    }

    async fn find(
        &self,
        _id: ReservationId,
        _stage: HandoffStage,
        _photo_id: PhotoId,
    ) -> Result<Option<PhotoAttachment>, PhotoRepositoryError> {
        Ok(None)
    }

    async fn delete(&self, _photo_id: PhotoId) -> Result<bool, PhotoRepositoryError> {
        Ok(false)
    }

    async fn count(
        &self,
        _id: ReservationId,
        _stage: HandoffStage,
    ) -> Result<u32, PhotoRepositoryError> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn fixture_insert_echoes_metadata() {
        let repo = FixturePhotoRepository;
        let new_photo = NewPhoto {
            reservation_id: ReservationId::new(4),
            stage: HandoffStage::PostDropoff,
            content_type: "image/png".to_owned(),
            byte_size: 128,
            checksum: "ab".repeat(32),
            blob_key: "reservations/4/post_dropoff/x".to_owned(),
        };
        let stored = repo.insert(&new_photo).await.expect("fixture insert");
        assert_eq!(stored.reservation_id, new_photo.reservation_id);
        assert_eq!(stored.content_type, "image/png");
    }

    #[tokio::test]
    async fn fixture_counts_zero() {
        let repo = FixturePhotoRepository;
        let count = repo
            .count(ReservationId::new(4), HandoffStage::PostDropoff)
            .await
            .expect("fixture count");
        assert_eq!(count, 0);
    }
}
