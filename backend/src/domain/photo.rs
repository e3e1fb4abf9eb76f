//! Photo attachments documenting checklist completion.
//!
//! Photos are stored out of band in a blob store; the domain only carries
//! metadata (MIME type, size, integrity checksum, blob key). Upload policy
//! limits live here so every adapter enforces the same rules.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::reservation::ReservationId;
use super::stage::HandoffStage;

/// Opaque numeric identifier of a photo attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct PhotoId(i64);

impl PhotoId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for PhotoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Metadata for one uploaded image, owned by exactly one
/// (reservation, stage) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhotoAttachment {
    /// Attachment identifier.
    pub id: PhotoId,
    /// Owning reservation.
    pub reservation_id: ReservationId,
    /// Owning hand-off stage.
    pub stage: HandoffStage,
    /// Image MIME type as sniffed at upload time.
    pub content_type: String,
    /// Payload size in bytes.
    pub byte_size: i64,
    /// Hex-encoded SHA-256 of the payload.
    pub checksum: String,
    /// Key under which the bytes live in the blob store.
    #[serde(skip_serializing)]
    pub blob_key: String,
    /// Upload timestamp.
    pub created_at: DateTime<Utc>,
}

/// Upload policy: per-stage count limit, byte ceiling, MIME allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoPolicy {
    /// Maximum number of photos per (reservation, stage).
    pub max_photos_per_stage: u32,
    /// Maximum decoded payload size in bytes.
    pub max_bytes: usize,
    /// Allowed image MIME types.
    pub allowed_types: Vec<String>,
}

impl Default for PhotoPolicy {
    fn default() -> Self {
        Self {
            max_photos_per_stage: 5,
            max_bytes: 10 * 1024 * 1024,
            allowed_types: ["image/jpeg", "image/png", "image/gif", "image/webp"]
                .iter()
                .map(|mime| (*mime).to_owned())
                .collect(),
        }
    }
}

impl PhotoPolicy {
    /// Whether the sniffed MIME type is on the allow-list.
    pub fn allows_type(&self, mime: &str) -> bool {
        self.allowed_types.iter().any(|allowed| allowed == mime)
    }
}

/// Sniff an image MIME type from payload magic bytes.
///
/// Declared content types are never trusted; the bytes decide. Returns
/// `None` when the payload is not a recognised image format.
pub fn detect_image_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]) {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.starts_with(b"RIFF") && bytes.get(8..12) == Some(b"WEBP".as_slice()) {
        Some("image/webp")
    } else {
        None
    }
}
