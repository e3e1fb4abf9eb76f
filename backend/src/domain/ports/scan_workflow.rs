//! Driving port for the two-phase staff scan protocol.
//!
//! One operation serves both phases: without `confirm` it is a pure read
//! returning a preview, with `confirm` it performs the atomic transition.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::actor::Actor;
use crate::domain::checklist::Checklist;
use crate::domain::code::VerificationCode;
use crate::domain::error::Error;
use crate::domain::reservation::{ReservationId, ReservationSummary};
use crate::domain::stage::{HandoffStage, Stage};

/// A scanned code plus the caller's commit intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    /// The scanned code, whitespace not yet stripped.
    pub code: String,
    /// `false` previews the transition; `true` commits it.
    pub confirm: bool,
}

/// What a confirm would do, shown to staff before committing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanPreview {
    /// Condensed reservation view.
    pub reservation: ReservationSummary,
    /// Stage the scanned code belongs to (equals the current stage).
    pub stage: HandoffStage,
    /// Stage a confirm would move to.
    pub next_stage: Stage,
    /// Whether the checklist gate currently holds.
    pub satisfied: bool,
    /// The current stage's checklist, for display.
    pub checklist: Checklist,
}

/// A committed transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanTransition {
    /// The reservation that moved.
    pub reservation_id: ReservationId,
    /// Stage left behind.
    pub from: HandoffStage,
    /// Stage entered.
    pub to: Stage,
    /// Code issued for the entered stage; `None` when `to` is terminal.
    pub next_code: Option<VerificationCode>,
}

/// Result of one scan call.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// Preview only; nothing was mutated.
    Preview(ScanPreview),
    /// The transition committed.
    Committed(ScanTransition),
}

/// Driving port implemented by the scan service.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScanWorkflow: Send + Sync {
    /// Execute one phase of the scan protocol for `actor`.
    async fn scan(&self, actor: &Actor, request: ScanRequest) -> Result<ScanOutcome, Error>;
}
