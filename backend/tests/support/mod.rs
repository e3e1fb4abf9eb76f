//! In-memory adapters backing the integration tests.
//!
//! These implement the driven ports over mutex-guarded maps and enforce
//! the same storage invariants as the SQL schema: one global code
//! namespace, one immutable code slot per (reservation, stage) pair, and
//! a conditional stage write.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use gearpass::domain::ports::{
    BlobStore, BlobStoreError, ChecklistRecord, ChecklistRepository, ChecklistRepositoryError,
    CodeBinding, NewPhoto, NotifyError, PhotoRepository, PhotoRepositoryError,
    ReservationRepository, ReservationRepositoryError, StageChange, StageNotifier, StageWrite,
};
use gearpass::domain::{
    ChecklistItem, HandoffStage, PhotoAttachment, PhotoId, Reservation, ReservationId, Stage,
    VerificationCode,
};

/// Build a reservation fixture owned by customer 1001, event 7, store 4.
pub fn reservation(id: i64, stage: Stage) -> Reservation {
    Reservation {
        id: ReservationId::new(id),
        customer_id: 1001,
        event_id: Some(7),
        store_id: Some(4),
        event_name: Some("Harbour Lights Festival".to_owned()),
        store_name: Some("Quayside Depot".to_owned()),
        stage,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[derive(Default)]
struct ReservationStore {
    reservations: HashMap<i64, Reservation>,
    codes: HashMap<String, (i64, HandoffStage)>,
    slots: HashMap<(i64, HandoffStage), String>,
}

/// Mutex-guarded reservation and code registry.
#[derive(Default)]
pub struct MemoryReservationRepository {
    inner: Mutex<ReservationStore>,
}

impl MemoryReservationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, reservation: Reservation) {
        let mut store = self.inner.lock().expect("store lock");
        store
            .reservations
            .insert(reservation.id.get(), reservation);
    }

    /// Pre-issue a code, bypassing the draw loop.
    pub fn seed_code(&self, id: i64, stage: HandoffStage, code: &str) {
        let mut store = self.inner.lock().expect("store lock");
        store.codes.insert(code.to_owned(), (id, stage));
        store.slots.insert((id, stage), code.to_owned());
    }

    pub fn stage_of(&self, id: i64) -> Option<Stage> {
        let store = self.inner.lock().expect("store lock");
        store.reservations.get(&id).map(|r| r.stage)
    }

    pub fn code_for(&self, id: i64, stage: HandoffStage) -> Option<String> {
        let store = self.inner.lock().expect("store lock");
        store.slots.get(&(id, stage)).cloned()
    }

    pub fn issued_codes(&self) -> Vec<String> {
        let store = self.inner.lock().expect("store lock");
        store.codes.keys().cloned().collect()
    }
}

#[async_trait]
impl ReservationRepository for MemoryReservationRepository {
    async fn find_by_id(
        &self,
        id: ReservationId,
    ) -> Result<Option<Reservation>, ReservationRepositoryError> {
        let store = self.inner.lock().expect("store lock");
        Ok(store.reservations.get(&id.get()).cloned())
    }

    async fn resolve_code(
        &self,
        code: &VerificationCode,
    ) -> Result<Option<CodeBinding>, ReservationRepositoryError> {
        let store = self.inner.lock().expect("store lock");
        Ok(store
            .codes
            .get(code.as_str())
            .map(|(id, stage)| CodeBinding {
                reservation_id: ReservationId::new(*id),
                stage: *stage,
            }))
    }

    async fn stage_codes(
        &self,
        id: ReservationId,
    ) -> Result<gearpass::domain::StageCodes, ReservationRepositoryError> {
        let store = self.inner.lock().expect("store lock");
        let mut codes = gearpass::domain::StageCodes::default();
        for ((owner, stage), code) in &store.slots {
            if *owner == id.get() {
                let code = VerificationCode::parse(code)
                    .map_err(|_| ReservationRepositoryError::query("stored code invalid"))?;
                codes.set_if_absent(*stage, code);
            }
        }
        Ok(codes)
    }

    async fn assign_code_if_absent(
        &self,
        id: ReservationId,
        stage: HandoffStage,
        candidate: &VerificationCode,
    ) -> Result<VerificationCode, ReservationRepositoryError> {
        let mut store = self.inner.lock().expect("store lock");
        if let Some(existing) = store.slots.get(&(id.get(), stage)) {
            let existing = VerificationCode::parse(existing)
                .map_err(|_| ReservationRepositoryError::query("stored code invalid"))?;
            return Ok(existing);
        }
        if store.codes.contains_key(candidate.as_str()) {
            return Err(ReservationRepositoryError::code_taken(candidate.as_str()));
        }
        store
            .codes
            .insert(candidate.as_str().to_owned(), (id.get(), stage));
        store
            .slots
            .insert((id.get(), stage), candidate.as_str().to_owned());
        Ok(candidate.clone())
    }

    async fn advance_stage(
        &self,
        id: ReservationId,
        expected: HandoffStage,
        next: Stage,
    ) -> Result<StageWrite, ReservationRepositoryError> {
        let mut store = self.inner.lock().expect("store lock");
        let Some(reservation) = store.reservations.get_mut(&id.get()) else {
            return Ok(StageWrite::StaleStage);
        };
        if reservation.stage != expected.stage() {
            return Ok(StageWrite::StaleStage);
        }
        reservation.stage = next;
        reservation.updated_at = Utc::now();
        Ok(StageWrite::Advanced)
    }

    async fn set_stage(
        &self,
        id: ReservationId,
        stage: Stage,
    ) -> Result<(), ReservationRepositoryError> {
        let mut store = self.inner.lock().expect("store lock");
        let reservation = store
            .reservations
            .get_mut(&id.get())
            .ok_or_else(|| ReservationRepositoryError::query("reservation not found"))?;
        reservation.stage = stage;
        reservation.updated_at = Utc::now();
        Ok(())
    }
}

/// Mutex-guarded checklist rows.
#[derive(Default)]
pub struct MemoryChecklistRepository {
    rows: Mutex<HashMap<(i64, HandoffStage), ChecklistRecord>>,
}

impl MemoryChecklistRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a stored checklist directly.
    pub fn seed(&self, id: i64, stage: HandoffStage, record: ChecklistRecord) {
        self.rows
            .lock()
            .expect("rows lock")
            .insert((id, stage), record);
    }
}

#[async_trait]
impl ChecklistRepository for MemoryChecklistRepository {
    async fn find(
        &self,
        id: ReservationId,
        stage: HandoffStage,
    ) -> Result<Option<ChecklistRecord>, ChecklistRepositoryError> {
        let rows = self.rows.lock().expect("rows lock");
        Ok(rows.get(&(id.get(), stage)).cloned())
    }

    async fn upsert_items(
        &self,
        id: ReservationId,
        stage: HandoffStage,
        items: &[ChecklistItem],
    ) -> Result<(), ChecklistRepositoryError> {
        let mut rows = self.rows.lock().expect("rows lock");
        let record = rows.entry((id.get(), stage)).or_insert(ChecklistRecord {
            items: Vec::new(),
            completed: false,
            completed_at: None,
        });
        record.items = items.to_vec();
        Ok(())
    }

    async fn set_completed(
        &self,
        id: ReservationId,
        stage: HandoffStage,
        completed_at: Option<chrono::DateTime<Utc>>,
    ) -> Result<(), ChecklistRepositoryError> {
        let mut rows = self.rows.lock().expect("rows lock");
        let record = rows.entry((id.get(), stage)).or_insert(ChecklistRecord {
            items: Vec::new(),
            completed: false,
            completed_at: None,
        });
        record.completed = completed_at.is_some();
        record.completed_at = completed_at;
        Ok(())
    }
}

/// Mutex-guarded photo metadata rows with sequential identifiers.
#[derive(Default)]
pub struct MemoryPhotoRepository {
    inner: Mutex<PhotoStore>,
}

#[derive(Default)]
struct PhotoStore {
    next_id: i64,
    rows: Vec<PhotoAttachment>,
}

impl MemoryPhotoRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<PhotoAttachment> {
        self.inner.lock().expect("photo lock").rows.clone()
    }
}

#[async_trait]
impl PhotoRepository for MemoryPhotoRepository {
    async fn insert(&self, photo: &NewPhoto) -> Result<PhotoAttachment, PhotoRepositoryError> {
        let mut store = self.inner.lock().expect("photo lock");
        store.next_id += 1;
        let attachment = PhotoAttachment {
            id: PhotoId::new(store.next_id),
            reservation_id: photo.reservation_id,
            stage: photo.stage,
            content_type: photo.content_type.clone(),
            byte_size: photo.byte_size,
            checksum: photo.checksum.clone(),
            blob_key: photo.blob_key.clone(),
            created_at: Utc::now(),
        };
        store.rows.push(attachment.clone());
        Ok(attachment)
    }

    async fn find(
        &self,
        id: ReservationId,
        stage: HandoffStage,
        photo_id: PhotoId,
    ) -> Result<Option<PhotoAttachment>, PhotoRepositoryError> {
        let store = self.inner.lock().expect("photo lock");
        Ok(store
            .rows
            .iter()
            .find(|row| row.id == photo_id && row.reservation_id == id && row.stage == stage)
            .cloned())
    }

    async fn delete(&self, photo_id: PhotoId) -> Result<bool, PhotoRepositoryError> {
        let mut store = self.inner.lock().expect("photo lock");
        let before = store.rows.len();
        store.rows.retain(|row| row.id != photo_id);
        Ok(store.rows.len() < before)
    }

    async fn count(
        &self,
        id: ReservationId,
        stage: HandoffStage,
    ) -> Result<u32, PhotoRepositoryError> {
        let store = self.inner.lock().expect("photo lock");
        let count = store
            .rows
            .iter()
            .filter(|row| row.reservation_id == id && row.stage == stage)
            .count();
        Ok(count as u32)
    }
}

/// Mutex-guarded blob map.
#[derive(Default)]
pub struct MemoryBlobStore {
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        self.blobs.lock().expect("blob lock").keys().cloned().collect()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, bytes: &[u8]) -> Result<(), BlobStoreError> {
        self.blobs
            .lock()
            .expect("blob lock")
            .insert(key.to_owned(), bytes.to_vec());
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>, BlobStoreError> {
        self.blobs
            .lock()
            .expect("blob lock")
            .get(key)
            .cloned()
            .ok_or_else(|| BlobStoreError::not_found(key))
    }

    async fn delete(&self, key: &str) -> Result<(), BlobStoreError> {
        self.blobs.lock().expect("blob lock").remove(key);
        Ok(())
    }
}

/// Notifier that records every stage change it is handed.
#[derive(Default)]
pub struct RecordingNotifier {
    changes: Mutex<Vec<StageChange>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn changes(&self) -> Vec<StageChange> {
        self.changes.lock().expect("changes lock").clone()
    }
}

#[async_trait]
impl StageNotifier for RecordingNotifier {
    async fn stage_changed(&self, change: &StageChange) -> Result<(), NotifyError> {
        self.changes.lock().expect("changes lock").push(change.clone());
        Ok(())
    }
}
