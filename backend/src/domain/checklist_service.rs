//! Owner-facing checklist and photo operations.
//!
//! One service implements both driving ports: checklist reads/updates and
//! the photo attach/detach/fetch surface. The completion gate is enforced
//! here on *setting* `completed`; the scan service only ever reads the
//! resulting flag back through [`Checklist::is_satisfied`].

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::Utc;
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::warn;
use uuid::Uuid;

use super::actor::Actor;
use super::checklist::{Checklist, ChecklistTemplates};
use super::error::Error;
use super::photo::{PhotoAttachment, PhotoId, PhotoPolicy, detect_image_mime};
use super::ports::{
    BlobStore, BlobStoreError, ChecklistAccess, ChecklistRepository, ChecklistRepositoryError,
    ChecklistUpdate, NewPhoto, PhotoAccess, PhotoRaw, PhotoRepository, PhotoRepositoryError,
    PhotoUpload, ReservationRepository, ReservationRepositoryError,
};
use super::reservation::{Reservation, ReservationId};
use super::stage::HandoffStage;

/// Checklist and photo service backed by the persistence and blob ports.
pub struct ChecklistService<R, C, P, B> {
    reservations: Arc<R>,
    checklists: Arc<C>,
    photos: Arc<P>,
    blobs: Arc<B>,
    templates: ChecklistTemplates,
    policy: PhotoPolicy,
}

impl<R, C, P, B> ChecklistService<R, C, P, B> {
    /// Assemble the service from its ports, templates, and upload policy.
    pub fn new(
        reservations: Arc<R>,
        checklists: Arc<C>,
        photos: Arc<P>,
        blobs: Arc<B>,
        templates: ChecklistTemplates,
        policy: PhotoPolicy,
    ) -> Self {
        Self {
            reservations,
            checklists,
            photos,
            blobs,
            templates,
            policy,
        }
    }
}

impl<R, C, P, B> ChecklistService<R, C, P, B>
where
    R: ReservationRepository,
    C: ChecklistRepository,
    P: PhotoRepository,
    B: BlobStore,
{
    async fn load_reservation(&self, id: ReservationId) -> Result<Reservation, Error> {
        self.reservations
            .find_by_id(id)
            .await
            .map_err(map_reservation_error)?
            .ok_or_else(|| Error::reservation_not_found("reservation does not exist"))
    }

    /// Stored checklist with the photo count folded in; template items
    /// materialised when nothing has been written yet.
    async fn load_checklist(
        &self,
        id: ReservationId,
        stage: HandoffStage,
    ) -> Result<Checklist, Error> {
        let record = self
            .checklists
            .find(id, stage)
            .await
            .map_err(map_checklist_error)?;
        let photo_count = self
            .photos
            .count(id, stage)
            .await
            .map_err(map_photo_error)?;
        Ok(match record {
            Some(record) => record.with_photo_count(photo_count),
            None => {
                let mut fresh = Checklist::from_template(&self.templates.labels_for(stage));
                fresh.photo_count = photo_count;
                fresh
            }
        })
    }

    fn decode_payload(&self, upload: &PhotoUpload) -> Result<Vec<u8>, Error> {
        // Accept both a bare base64 payload and a `data:` URL.
        let encoded = match upload.data.split_once(',') {
            Some((prefix, rest)) if prefix.starts_with("data:") => rest,
            _ => upload.data.as_str(),
        };
        BASE64
            .decode(encoded.trim())
            .map_err(|_| Error::validation("photo payload is not valid base64"))
    }
}

#[async_trait]
impl<R, C, P, B> ChecklistAccess for ChecklistService<R, C, P, B>
where
    R: ReservationRepository,
    C: ChecklistRepository,
    P: PhotoRepository,
    B: BlobStore,
{
    async fn fetch(
        &self,
        actor: &Actor,
        id: ReservationId,
        stage: HandoffStage,
    ) -> Result<Checklist, Error> {
        let reservation = self.load_reservation(id).await?;
        actor.authorize_owner_or_staff(&reservation)?;
        self.load_checklist(id, stage).await
    }

    async fn update(
        &self,
        actor: &Actor,
        id: ReservationId,
        stage: HandoffStage,
        update: ChecklistUpdate,
    ) -> Result<Checklist, Error> {
        let reservation = self.load_reservation(id).await?;
        actor.authorize_owner(&reservation)?;

        let mut current = self.load_checklist(id, stage).await?;

        if let Some(items) = update.items {
            self.checklists
                .upsert_items(id, stage, &items)
                .await
                .map_err(map_checklist_error)?;
            current.items = items;
        }

        match update.completed {
            Some(true) => {
                if current.photo_count == 0 {
                    return Err(Error::photo_required(
                        "completion requires at least one attached photo",
                    )
                    .with_details(json!({ "stage": stage })));
                }
                if !current.all_items_checked() {
                    return Err(Error::checklist_incomplete(
                        "completion requires every checklist item to be checked",
                    )
                    .with_details(json!({ "stage": stage })));
                }
                let now = Utc::now();
                self.checklists
                    .set_completed(id, stage, Some(now))
                    .await
                    .map_err(map_checklist_error)?;
                current.completed = true;
                current.completed_at = Some(now);
            }
            Some(false) => {
                self.checklists
                    .set_completed(id, stage, None)
                    .await
                    .map_err(map_checklist_error)?;
                current.completed = false;
                current.completed_at = None;
            }
            None => {}
        }

        Ok(current)
    }
}

#[async_trait]
impl<R, C, P, B> PhotoAccess for ChecklistService<R, C, P, B>
where
    R: ReservationRepository,
    C: ChecklistRepository,
    P: PhotoRepository,
    B: BlobStore,
{
    async fn attach(
        &self,
        actor: &Actor,
        id: ReservationId,
        stage: HandoffStage,
        upload: PhotoUpload,
    ) -> Result<PhotoAttachment, Error> {
        let reservation = self.load_reservation(id).await?;
        actor.authorize_owner(&reservation)?;

        let bytes = self.decode_payload(&upload)?;

        let mime = detect_image_mime(&bytes)
            .filter(|mime| self.policy.allows_type(mime))
            .ok_or_else(|| {
                Error::unsupported_type("payload is not an allowed image type").with_details(
                    json!({ "allowedTypes": self.policy.allowed_types }),
                )
            })?;

        if bytes.len() > self.policy.max_bytes {
            return Err(Error::file_too_large("photo exceeds the size limit")
                .with_details(json!({ "maxBytes": self.policy.max_bytes, "size": bytes.len() })));
        }

        let existing = self
            .photos
            .count(id, stage)
            .await
            .map_err(map_photo_error)?;
        if existing >= self.policy.max_photos_per_stage {
            return Err(Error::photo_limit("photo limit for this stage reached")
                .with_details(json!({ "maxPhotos": self.policy.max_photos_per_stage })));
        }

        let checksum = hex::encode(Sha256::digest(&bytes));
        let blob_key = format!("reservations/{id}/{stage}/{}", Uuid::new_v4());

        self.blobs
            .put(&blob_key, &bytes)
            .await
            .map_err(map_blob_error)?;

        let new_photo = NewPhoto {
            reservation_id: id,
            stage,
            content_type: mime.to_owned(),
            byte_size: bytes.len() as i64,
            checksum,
            blob_key: blob_key.clone(),
        };
        match self.photos.insert(&new_photo).await {
            Ok(attachment) => Ok(attachment),
            Err(err) => {
                // The blob is orphaned if the metadata write failed; try to
                // reclaim it, but the metadata error is what matters.
                if let Err(cleanup) = self.blobs.delete(&blob_key).await {
                    warn!(key = %blob_key, error = %cleanup, "orphaned blob cleanup failed");
                }
                Err(map_photo_error(err))
            }
        }
    }

    async fn detach(
        &self,
        actor: &Actor,
        id: ReservationId,
        stage: HandoffStage,
        photo_id: PhotoId,
    ) -> Result<Checklist, Error> {
        let reservation = self.load_reservation(id).await?;
        actor.authorize_owner(&reservation)?;

        let attachment = self
            .photos
            .find(id, stage, photo_id)
            .await
            .map_err(map_photo_error)?
            .ok_or_else(|| Error::photo_not_found("photo does not exist"))?;

        self.photos
            .delete(photo_id)
            .await
            .map_err(map_photo_error)?;
        if let Err(err) = self.blobs.delete(&attachment.blob_key).await {
            warn!(key = %attachment.blob_key, error = %err, "photo blob deletion failed");
        }

        let remaining = self
            .photos
            .count(id, stage)
            .await
            .map_err(map_photo_error)?;
        if remaining == 0 {
            // The photo that justified completion is gone.
            self.checklists
                .set_completed(id, stage, None)
                .await
                .map_err(map_checklist_error)?;
        }

        self.load_checklist(id, stage).await
    }

    async fn fetch_raw(
        &self,
        actor: &Actor,
        id: ReservationId,
        stage: HandoffStage,
        photo_id: PhotoId,
    ) -> Result<PhotoRaw, Error> {
        let reservation = self.load_reservation(id).await?;
        actor.authorize_owner_or_staff(&reservation)?;

        let attachment = self
            .photos
            .find(id, stage, photo_id)
            .await
            .map_err(map_photo_error)?
            .ok_or_else(|| Error::photo_not_found("photo does not exist"))?;

        let bytes = self
            .blobs
            .get(&attachment.blob_key)
            .await
            .map_err(map_blob_error)?;

        Ok(PhotoRaw {
            content_type: attachment.content_type,
            bytes,
        })
    }
}

fn map_reservation_error(error: ReservationRepositoryError) -> Error {
    match error {
        ReservationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("reservation repository unavailable: {message}"))
        }
        other => Error::internal(format!("reservation repository error: {other}")),
    }
}

fn map_checklist_error(error: ChecklistRepositoryError) -> Error {
    match error {
        ChecklistRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("checklist repository unavailable: {message}"))
        }
        ChecklistRepositoryError::Query { message } => {
            Error::internal(format!("checklist repository error: {message}"))
        }
    }
}

fn map_photo_error(error: PhotoRepositoryError) -> Error {
    match error {
        PhotoRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("photo repository unavailable: {message}"))
        }
        PhotoRepositoryError::Query { message } => {
            Error::internal(format!("photo repository error: {message}"))
        }
    }
}

fn map_blob_error(error: BlobStoreError) -> Error {
    match error {
        BlobStoreError::Io { message } => {
            Error::internal(format!("blob store error: {message}"))
        }
        BlobStoreError::NotFound { key } => {
            // Metadata without bytes is a store inconsistency, not a
            // client-addressable missing photo.
            Error::internal(format!("blob missing for stored photo: {key}"))
        }
    }
}
