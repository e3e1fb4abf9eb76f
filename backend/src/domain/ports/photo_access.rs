//! Driving port for checklist photo uploads, removal, and retrieval.

use async_trait::async_trait;

use crate::domain::actor::Actor;
use crate::domain::checklist::Checklist;
use crate::domain::error::Error;
use crate::domain::photo::{PhotoAttachment, PhotoId};
use crate::domain::reservation::ReservationId;
use crate::domain::stage::HandoffStage;

/// An uploaded image payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoUpload {
    /// Base64 payload, optionally prefixed with a `data:` URL header.
    pub data: String,
    /// Client-supplied display name.
    pub name: Option<String>,
}

/// Raw photo bytes with their stored MIME type, ready to stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoRaw {
    /// MIME type sniffed at upload time.
    pub content_type: String,
    /// The image bytes.
    pub bytes: Vec<u8>,
}

/// Driving port implemented by the checklist service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PhotoAccess: Send + Sync {
    /// Validate and store an uploaded image, returning its metadata.
    async fn attach(
        &self,
        actor: &Actor,
        id: ReservationId,
        stage: HandoffStage,
        upload: PhotoUpload,
    ) -> Result<PhotoAttachment, Error>;

    /// Remove a photo, returning the checklist after the forced
    /// re-derivation (completion resets when the count reaches zero).
    async fn detach(
        &self,
        actor: &Actor,
        id: ReservationId,
        stage: HandoffStage,
        photo_id: PhotoId,
    ) -> Result<Checklist, Error>;

    /// Fetch the stored bytes for streaming back to the client.
    async fn fetch_raw(
        &self,
        actor: &Actor,
        id: ReservationId,
        stage: HandoffStage,
        photo_id: PhotoId,
    ) -> Result<PhotoRaw, Error>;
}
