//! Driving port for administrative stage overrides.
//!
//! Overrides bypass the checklist gate and the compare-and-swap guard;
//! they exist so staff can correct mistakes. Implementations must emit a
//! distinct audit event for every call.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::actor::Actor;
use crate::domain::code::VerificationCode;
use crate::domain::error::Error;
use crate::domain::reservation::ReservationId;
use crate::domain::stage::Stage;

/// Result of a direct stage set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StageOverrideOutcome {
    /// The reservation that was overridden.
    pub reservation_id: ReservationId,
    /// Stage before the write.
    pub from: Stage,
    /// Stage after the write.
    pub to: Stage,
    /// Code now occupying the destination stage's slot, pre-issued so a
    /// later scan still has something to match; `None` for `done`.
    pub code: Option<VerificationCode>,
}

/// Driving port implemented by the admin stage service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StageOverrideCommand: Send + Sync {
    /// Set a reservation to an arbitrary lifecycle stage.
    async fn set_stage(
        &self,
        actor: &Actor,
        id: ReservationId,
        target: Stage,
    ) -> Result<StageOverrideOutcome, Error>;
}
