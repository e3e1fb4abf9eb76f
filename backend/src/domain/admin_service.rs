//! Administrative stage overrides.
//!
//! The override path deliberately skips the checklist gate and the
//! compare-and-swap guard: it exists to correct operator mistakes and to
//! unstick reservations the linear protocol cannot reach. Every call emits
//! an audit record regardless of whether the stage actually changed.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::actor::Actor;
use super::code_issuer::CodeIssuer;
use super::error::Error;
use super::ports::{
    ReservationRepository, ReservationRepositoryError, StageChange, StageNotifier,
    StageOverrideCommand, StageOverrideOutcome, TransitionKind,
};
use super::reservation::ReservationId;
use super::stage::{HandoffStage, Stage};

/// Stage override service backed by the reservation repository.
pub struct AdminStageService<R, N> {
    reservations: Arc<R>,
    notifier: Arc<N>,
    issuer: CodeIssuer<R>,
}

impl<R, N> AdminStageService<R, N> {
    /// Assemble the service from its ports.
    pub fn new(reservations: Arc<R>, notifier: Arc<N>) -> Self {
        let issuer = CodeIssuer::new(Arc::clone(&reservations));
        Self {
            reservations,
            notifier,
            issuer,
        }
    }
}

#[async_trait]
impl<R, N> StageOverrideCommand for AdminStageService<R, N>
where
    R: ReservationRepository,
    N: StageNotifier,
{
    async fn set_stage(
        &self,
        actor: &Actor,
        id: ReservationId,
        target: Stage,
    ) -> Result<StageOverrideOutcome, Error> {
        let reservation = self
            .reservations
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::reservation_not_found("reservation does not exist"))?;

        actor.authorize_staff(&reservation)?;

        // Ensure the destination stage has a scannable code before the
        // stage becomes visible; the slot may already be filled if the
        // reservation passed through this stage before.
        let code = match HandoffStage::try_from(target) {
            Ok(target_handoff) => Some(self.issuer.issue(id, target_handoff).await?),
            Err(_) => None,
        };

        self.reservations
            .set_stage(id, target)
            .await
            .map_err(map_repository_error)?;

        info!(
            audit = "stage_override",
            reservation_id = %id,
            from = %reservation.stage,
            to = %target,
            "stage set by administrative override"
        );

        let change = StageChange {
            reservation_id: id,
            from: reservation.stage,
            to: target,
            kind: TransitionKind::Override,
        };
        if let Err(err) = self.notifier.stage_changed(&change).await {
            warn!(reservation_id = %id, error = %err, "stage notification failed");
        }

        Ok(StageOverrideOutcome {
            reservation_id: id,
            from: reservation.stage,
            to: target,
            code,
        })
    }
}

fn map_repository_error(error: ReservationRepositoryError) -> Error {
    match error {
        ReservationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("reservation repository unavailable: {message}"))
        }
        other => Error::internal(format!("reservation repository error: {other}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::ErrorCode;
    use crate::domain::ports::{MockReservationRepository, MockStageNotifier};
    use crate::domain::reservation::Reservation;
    use chrono::Utc;

    fn reservation(stage: Stage) -> Reservation {
        Reservation {
            id: ReservationId::new(8),
            customer_id: 2,
            event_id: Some(1),
            store_id: Some(1),
            event_name: None,
            store_name: None,
            stage,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn override_sets_any_stage_and_issues_its_code() {
        let mut repo = MockReservationRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Ok(Some(reservation(Stage::Done))));
        repo.expect_assign_code_if_absent()
            .times(1)
            .withf(|_, stage, _| *stage == HandoffStage::PreDropoff)
            .returning(|_, _, candidate| Ok(candidate.clone()));
        repo.expect_set_stage()
            .times(1)
            .withf(|_, stage| *stage == Stage::PreDropoff)
            .returning(|_, _| Ok(()));
        let mut notifier = MockStageNotifier::new();
        notifier
            .expect_stage_changed()
            .times(1)
            .withf(|change| change.kind == TransitionKind::Override)
            .returning(|_| Ok(()));

        let service = AdminStageService::new(Arc::new(repo), Arc::new(notifier));
        let outcome = service
            .set_stage(&Actor::Admin, ReservationId::new(8), Stage::PreDropoff)
            .await
            .expect("override succeeds");
        assert_eq!(outcome.from, Stage::Done);
        assert_eq!(outcome.to, Stage::PreDropoff);
        assert!(outcome.code.is_some());
    }

    #[tokio::test]
    async fn override_to_done_issues_no_code() {
        let mut repo = MockReservationRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Ok(Some(reservation(Stage::PreDropoff))));
        repo.expect_set_stage().returning(|_, _| Ok(()));
        let mut notifier = MockStageNotifier::new();
        notifier.expect_stage_changed().returning(|_| Ok(()));

        let service = AdminStageService::new(Arc::new(repo), Arc::new(notifier));
        let outcome = service
            .set_stage(&Actor::Admin, ReservationId::new(8), Stage::Done)
            .await
            .expect("override succeeds");
        assert!(outcome.code.is_none());
    }

    #[tokio::test]
    async fn customers_cannot_override() {
        let mut repo = MockReservationRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Ok(Some(reservation(Stage::PrePickup))));
        let service = AdminStageService::new(Arc::new(repo), Arc::new(MockStageNotifier::new()));

        let error = service
            .set_stage(
                &Actor::Customer { customer_id: 2 },
                ReservationId::new(8),
                Stage::Done,
            )
            .await
            .expect_err("customer override");
        assert_eq!(error.code(), ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn missing_reservations_are_reported() {
        let mut repo = MockReservationRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));
        let service = AdminStageService::new(Arc::new(repo), Arc::new(MockStageNotifier::new()));

        let error = service
            .set_stage(&Actor::Admin, ReservationId::new(99), Stage::Done)
            .await
            .expect_err("missing reservation");
        assert_eq!(error.code(), ErrorCode::ReservationNotFound);
    }
}
