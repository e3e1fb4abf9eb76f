//! Driving port for owner-facing checklist reads and updates.

use async_trait::async_trait;

use crate::domain::actor::Actor;
use crate::domain::checklist::{Checklist, ChecklistItem};
use crate::domain::error::Error;
use crate::domain::reservation::ReservationId;
use crate::domain::stage::HandoffStage;

/// Partial checklist update; absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecklistUpdate {
    /// Replacement item list.
    pub items: Option<Vec<ChecklistItem>>,
    /// New completion flag. Setting `true` is gated on a present photo
    /// and fully checked items; setting `false` always succeeds.
    pub completed: Option<bool>,
}

/// Driving port implemented by the checklist service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChecklistAccess: Send + Sync {
    /// Current checklist for a (reservation, stage) pair, template items
    /// materialised when nothing has been stored yet.
    async fn fetch(
        &self,
        actor: &Actor,
        id: ReservationId,
        stage: HandoffStage,
    ) -> Result<Checklist, Error>;

    /// Apply a partial update and return the resulting checklist.
    async fn update(
        &self,
        actor: &Actor,
        id: ReservationId,
        stage: HandoffStage,
        update: ChecklistUpdate,
    ) -> Result<Checklist, Error>;
}
