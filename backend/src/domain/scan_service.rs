//! The two-phase staff scan workflow.
//!
//! A scan without `confirm` is a pure read: it resolves the code, checks
//! authorisation and stage alignment, and reports what a confirm would do.
//! A confirmed scan re-checks the checklist gate, pre-issues the next
//! stage's code, then commits the transition with a single conditional
//! write. When two confirms race, the storage compare-and-swap decides the
//! winner; the loser observes zero rows written and reports a stage
//! mismatch without ever reading back.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use super::actor::Actor;
use super::checklist::{Checklist, ChecklistTemplates};
use super::code::VerificationCode;
use super::code_issuer::CodeIssuer;
use super::error::Error;
use super::ports::{
    ChecklistRepository, ChecklistRepositoryError, PhotoRepository, PhotoRepositoryError,
    ReservationRepository, ReservationRepositoryError, ScanOutcome, ScanPreview, ScanRequest,
    ScanTransition, ScanWorkflow, StageChange, StageNotifier, StageWrite, TransitionKind,
};
use super::reservation::{Reservation, ReservationId};
use super::stage::HandoffStage;

/// Scan workflow backed by the persistence and notification ports.
pub struct ScanService<R, C, P, N> {
    reservations: Arc<R>,
    checklists: Arc<C>,
    photos: Arc<P>,
    notifier: Arc<N>,
    templates: ChecklistTemplates,
    issuer: CodeIssuer<R>,
}

impl<R, C, P, N> ScanService<R, C, P, N> {
    /// Assemble the service from its ports and checklist templates.
    pub fn new(
        reservations: Arc<R>,
        checklists: Arc<C>,
        photos: Arc<P>,
        notifier: Arc<N>,
        templates: ChecklistTemplates,
    ) -> Self {
        let issuer = CodeIssuer::new(Arc::clone(&reservations));
        Self {
            reservations,
            checklists,
            photos,
            notifier,
            templates,
            issuer,
        }
    }
}

impl<R, C, P, N> ScanService<R, C, P, N>
where
    R: ReservationRepository,
    C: ChecklistRepository,
    P: PhotoRepository,
    N: StageNotifier,
{
    /// Resolve the scanned code and verify it addresses the reservation's
    /// current stage. Returns the reservation plus the stage being left.
    async fn resolve_scan(
        &self,
        actor: &Actor,
        raw_code: &str,
    ) -> Result<(Reservation, HandoffStage), Error> {
        // Malformed input is indistinguishable from an unknown code to the
        // scanning client, so both report the same category.
        let code = VerificationCode::parse(raw_code)
            .map_err(|_| Error::code_not_found("verification code is not recognised"))?;

        let binding = self
            .reservations
            .resolve_code(&code)
            .await
            .map_err(map_reservation_error)?
            .ok_or_else(|| Error::code_not_found("verification code is not recognised"))?;

        let reservation = self
            .reservations
            .find_by_id(binding.reservation_id)
            .await
            .map_err(map_reservation_error)?
            .ok_or_else(|| Error::reservation_not_found("reservation no longer exists"))?;

        actor.authorize_staff(&reservation)?;

        // The stage comparison comes first: a finished reservation matches
        // no hand-off stage, so even its own final code reads as stale.
        if binding.stage.stage() != reservation.stage {
            return Err(Error::status_not_match(
                "scanned code does not match the reservation's current stage",
            )
            .with_details(json!({
                "reservationId": reservation.id,
                "currentStage": reservation.stage,
                "codeStage": binding.stage,
            })));
        }

        // Unreachable when the comparison above passed; kept as the
        // terminal-stage guard should a code ever bind to `done`.
        let current = HandoffStage::try_from(reservation.stage).map_err(|_| {
            Error::already_done("reservation has completed its lifecycle")
                .with_details(json!({ "reservationId": reservation.id }))
        })?;

        Ok((reservation, current))
    }

    /// Current checklist for the stage, template items materialised when
    /// nothing has been stored yet, photo count folded in.
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

    async fn commit(
        &self,
        reservation: &Reservation,
        current: HandoffStage,
        checklist: &Checklist,
    ) -> Result<ScanTransition, Error> {
        if !checklist.is_satisfied() {
            return Err(Error::checklist_not_ready(
                "checklist must be completed with at least one photo before confirming",
            )
            .with_details(json!({
                "stage": current,
                "completed": checklist.completed,
                "photoCount": checklist.photo_count,
            })));
        }

        let next = current.next_stage();

        // Pre-issue the next stage's code before the stage write. The
        // assignment is idempotent, so if the compare-and-swap below loses
        // a race the winner has already converged on the same slot and the
        // orphaned draw is harmless.
        let next_code = match HandoffStage::try_from(next) {
            Ok(next_handoff) => Some(self.issuer.issue(reservation.id, next_handoff).await?),
            Err(_) => None,
        };

        match self
            .reservations
            .advance_stage(reservation.id, current, next)
            .await
            .map_err(map_reservation_error)?
        {
            StageWrite::Advanced => {}
            StageWrite::StaleStage => {
                return Err(Error::status_not_match(
                    "reservation stage changed since the code was scanned",
                )
                .with_details(json!({ "reservationId": reservation.id })));
            }
        }

        info!(
            reservation_id = %reservation.id,
            from = %current,
            to = %next,
            "stage transition committed"
        );

        let change = StageChange {
            reservation_id: reservation.id,
            from: current.stage(),
            to: next,
            kind: TransitionKind::Scan,
        };
        if let Err(err) = self.notifier.stage_changed(&change).await {
            warn!(reservation_id = %reservation.id, error = %err, "stage notification failed");
        }

        Ok(ScanTransition {
            reservation_id: reservation.id,
            from: current,
            to: next,
            next_code,
        })
    }
}

#[async_trait]
impl<R, C, P, N> ScanWorkflow for ScanService<R, C, P, N>
where
    R: ReservationRepository,
    C: ChecklistRepository,
    P: PhotoRepository,
    N: StageNotifier,
{
    async fn scan(&self, actor: &Actor, request: ScanRequest) -> Result<ScanOutcome, Error> {
        let (reservation, current) = self.resolve_scan(actor, &request.code).await?;
        let checklist = self.load_checklist(reservation.id, current).await?;

        if !request.confirm {
            return Ok(ScanOutcome::Preview(ScanPreview {
                reservation: reservation.summary(),
                stage: current,
                next_stage: current.next_stage(),
                satisfied: checklist.is_satisfied(),
                checklist,
            }));
        }

        let transition = self.commit(&reservation, current, &checklist).await?;
        Ok(ScanOutcome::Committed(transition))
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
