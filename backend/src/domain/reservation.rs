//! The reservation aggregate root.
//!
//! A reservation tracks one customer's equipment through the hand-off
//! lifecycle. Verification codes are issued per hand-off stage and are
//! immutable once set; [`StageCodes`] is the read-side view of the code
//! slots assembled from the code registry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::code::VerificationCode;
use super::stage::{HandoffStage, Stage};

/// Opaque numeric identifier of a reservation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct ReservationId(i64);

impl ReservationId {
    /// Wrap a raw identifier.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// The raw identifier.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for ReservationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reservation aggregate as loaded from the store.
///
/// `event_id`/`store_id` may be absent on legacy rows, which only carry
/// free-text event and store names; such rows fail store-scoped
/// authorisation and require administrative handling.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    /// Aggregate identity.
    pub id: ReservationId,
    /// Owning customer.
    pub customer_id: i64,
    /// Owning event, when linked.
    pub event_id: Option<i64>,
    /// Fulfilling store, when linked.
    pub store_id: Option<i64>,
    /// Legacy free-text event name.
    pub event_name: Option<String>,
    /// Legacy free-text store name.
    pub store_name: Option<String>,
    /// Current lifecycle stage, already normalised.
    pub stage: Stage,
    /// Row creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last mutation timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Condensed view returned in scan previews.
    pub fn summary(&self) -> ReservationSummary {
        ReservationSummary {
            id: self.id,
            customer_id: self.customer_id,
            event_id: self.event_id,
            store_id: self.store_id,
            stage: self.stage,
        }
    }
}

/// Condensed reservation view embedded in scan responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationSummary {
    /// Aggregate identity.
    pub id: ReservationId,
    /// Owning customer.
    pub customer_id: i64,
    /// Owning event, when linked.
    pub event_id: Option<i64>,
    /// Fulfilling store, when linked.
    pub store_id: Option<i64>,
    /// Current lifecycle stage.
    pub stage: Stage,
}

/// Read-side view of a reservation's four verification-code slots.
///
/// Slots fill as stages are entered and never empty afterwards; a slot for
/// a stage the reservation has passed stays set but is no longer scannable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StageCodes {
    slots: [Option<VerificationCode>; 4],
}

impl StageCodes {
    /// The code issued for the given stage, if any.
    pub fn get(&self, stage: HandoffStage) -> Option<&VerificationCode> {
        self.slots.get(Self::index(stage)).and_then(Option::as_ref)
    }

    /// Record a code in its slot; silently keeps the first value because
    /// codes are immutable once issued.
    pub fn set_if_absent(&mut self, stage: HandoffStage, code: VerificationCode) {
        if let Some(slot) = self.slots.get_mut(Self::index(stage)) {
            slot.get_or_insert(code);
        }
    }

    /// Iterate over the filled slots in stage order.
    pub fn iter(&self) -> impl Iterator<Item = (HandoffStage, &VerificationCode)> {
        HandoffStage::ALL
            .into_iter()
            .filter_map(|stage| self.get(stage).map(|code| (stage, code)))
    }

    const fn index(stage: HandoffStage) -> usize {
        match stage {
            HandoffStage::PreDropoff => 0,
            HandoffStage::PrePickup => 1,
            HandoffStage::PostDropoff => 2,
            HandoffStage::PostPickup => 3,
        }
    }
}
