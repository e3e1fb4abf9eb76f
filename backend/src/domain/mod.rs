//! Transport-agnostic domain model for the reservation hand-off lifecycle.
//!
//! Aggregates and the stage machine live beside the services that drive
//! them; `ports` defines the hexagonal boundary both inbound and outbound
//! adapters program against.

mod actor;
mod admin_service;
mod checklist;
mod checklist_service;
mod code;
mod code_issuer;
mod error;
mod photo;
mod reservation;
mod scan_service;
mod stage;

pub mod ports;

pub use actor::Actor;
pub use admin_service::AdminStageService;
pub use checklist::{Checklist, ChecklistItem, ChecklistTemplates};
pub use checklist_service::ChecklistService;
pub use code::{CODE_LENGTH, CodeValidationError, VerificationCode};
pub use code_issuer::CodeIssuer;
pub use error::{Error, ErrorCode, ErrorValidationError};
pub use photo::{PhotoAttachment, PhotoId, PhotoPolicy, detect_image_mime};
pub use reservation::{Reservation, ReservationId, ReservationSummary, StageCodes};
pub use scan_service::ScanService;
pub use stage::{HandoffStage, LEGACY_PRE_DROPOFF_ALIASES, Stage};
