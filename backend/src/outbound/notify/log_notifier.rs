//! Structured-log notification bridge.
//!
//! Emits one `info` event per committed stage change. Downstream systems
//! (push, email) consume the same port; this adapter is the deployment
//! default and never fails.

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{NotifyError, StageChange, StageNotifier};

/// Notifier that records stage changes in the service log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogStageNotifier;

#[async_trait]
impl StageNotifier for LogStageNotifier {
    async fn stage_changed(&self, change: &StageChange) -> Result<(), NotifyError> {
        info!(
            reservation_id = change.reservation_id.get(),
            from = change.from.as_str(),
            to = change.to.as_str(),
            kind = change.kind.as_str(),
            "reservation stage changed"
        );
        Ok(())
    }
}
