//! Port for the outbound notification bridge.
//!
//! Invoked after every successful stage transition. Delivery is strictly
//! best effort: callers log failures and never roll back or surface them.

use async_trait::async_trait;

use crate::domain::reservation::ReservationId;
use crate::domain::stage::Stage;

use super::define_port_error;

define_port_error! {
    /// Errors raised by notification adapters.
    pub enum NotifyError {
        /// The notification could not be delivered.
        Delivery { message: String } =>
            "stage notification delivery failed: {message}",
    }
}

/// How a stage change came about; overrides must be distinguishable from
/// scan-driven transitions in any downstream audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// A staff scan confirmed the transition.
    Scan,
    /// An administrator set the stage directly.
    Override,
}

impl TransitionKind {
    /// Stable label used in logs and notifications.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scan => "scan",
            Self::Override => "override",
        }
    }
}

/// A committed stage change handed to the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageChange {
    /// The reservation that moved.
    pub reservation_id: ReservationId,
    /// Stage before the write.
    pub from: Stage,
    /// Stage after the write.
    pub to: Stage,
    /// Scan-driven or administrative.
    pub kind: TransitionKind,
}

/// Best-effort notification port.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StageNotifier: Send + Sync {
    /// Announce a committed stage change.
    async fn stage_changed(&self, change: &StageChange) -> Result<(), NotifyError>;
}

/// Fixture implementation that swallows every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureStageNotifier;

#[async_trait]
impl StageNotifier for FixtureStageNotifier {
    async fn stage_changed(&self, _change: &StageChange) -> Result<(), NotifyError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TransitionKind::Scan, "scan")]
    #[case(TransitionKind::Override, "override")]
    fn kinds_have_stable_labels(#[case] kind: TransitionKind, #[case] label: &str) {
        assert_eq!(kind.as_str(), label);
    }

    #[tokio::test]
    async fn fixture_swallows_notifications() {
        let notifier = FixtureStageNotifier;
        let change = StageChange {
            reservation_id: ReservationId::new(1),
            from: Stage::PreDropoff,
            to: Stage::PrePickup,
            kind: TransitionKind::Scan,
        };
        notifier
            .stage_changed(&change)
            .await
            .expect("fixture always succeeds");
    }
}
