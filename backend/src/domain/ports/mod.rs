//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, blob store, notifier) expose strongly typed
//! errors so adapters map their failures into predictable variants.
//! Driving ports (scan, override, checklist, photo) are implemented by the
//! domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod blob_store;
mod checklist_access;
mod checklist_repository;
mod photo_access;
mod photo_repository;
mod reservation_repository;
mod scan_workflow;
mod stage_notifier;
mod stage_override;

pub use blob_store::{BlobStore, BlobStoreError, FixtureBlobStore};
#[cfg(test)]
pub use blob_store::MockBlobStore;
pub use checklist_access::{ChecklistAccess, ChecklistUpdate};
#[cfg(test)]
pub use checklist_access::MockChecklistAccess;
pub use checklist_repository::{
    ChecklistRecord, ChecklistRepository, ChecklistRepositoryError, FixtureChecklistRepository,
};
#[cfg(test)]
pub use checklist_repository::MockChecklistRepository;
pub use photo_access::{PhotoAccess, PhotoRaw, PhotoUpload};
#[cfg(test)]
pub use photo_access::MockPhotoAccess;
pub use photo_repository::{
    FixturePhotoRepository, NewPhoto, PhotoRepository, PhotoRepositoryError,
};
#[cfg(test)]
pub use photo_repository::MockPhotoRepository;
pub use reservation_repository::{
    CodeBinding, FixtureReservationRepository, ReservationRepository, ReservationRepositoryError,
    StageWrite,
};
#[cfg(test)]
pub use reservation_repository::MockReservationRepository;
pub use scan_workflow::{ScanOutcome, ScanPreview, ScanRequest, ScanTransition, ScanWorkflow};
#[cfg(test)]
pub use scan_workflow::MockScanWorkflow;
pub use stage_notifier::{
    FixtureStageNotifier, NotifyError, StageChange, StageNotifier, TransitionKind,
};
#[cfg(test)]
pub use stage_notifier::MockStageNotifier;
pub use stage_override::{StageOverrideCommand, StageOverrideOutcome};
#[cfg(test)]
pub use stage_override::MockStageOverrideCommand;
