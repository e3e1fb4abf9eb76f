//! Port for checklist persistence.
//!
//! Checklists are stored without their photo count; the count is derived
//! from the photo repository at read time and folded in by
//! [`ChecklistRecord::with_photo_count`].

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::checklist::{Checklist, ChecklistItem};
use crate::domain::reservation::ReservationId;
use crate::domain::stage::HandoffStage;

use super::define_port_error;

define_port_error! {
    /// Errors raised by checklist repository adapters.
    pub enum ChecklistRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "checklist repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "checklist repository query failed: {message}",
    }
}

/// Stored checklist state, photo count not yet folded in.
#[derive(Debug, Clone, PartialEq)]
pub struct ChecklistRecord {
    /// Ordered items as persisted.
    pub items: Vec<ChecklistItem>,
    /// Explicit completion flag.
    pub completed: bool,
    /// When the completion flag was last set.
    pub completed_at: Option<DateTime<Utc>>,
}

impl ChecklistRecord {
    /// Fold the derived photo count into the full aggregate view.
    pub fn with_photo_count(self, photo_count: u32) -> Checklist {
        Checklist {
            items: self.items,
            completed: self.completed,
            completed_at: self.completed_at,
            photo_count,
        }
    }
}

/// Persistence port for per-stage checklists.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChecklistRepository: Send + Sync {
    /// Fetch the stored checklist for a (reservation, stage) pair, or
    /// `None` when it has never been written.
    async fn find(
        &self,
        id: ReservationId,
        stage: HandoffStage,
    ) -> Result<Option<ChecklistRecord>, ChecklistRepositoryError>;

    /// Replace the item list, creating the row when absent. Leaves the
    /// completion flag untouched.
    async fn upsert_items(
        &self,
        id: ReservationId,
        stage: HandoffStage,
        items: &[ChecklistItem],
    ) -> Result<(), ChecklistRepositoryError>;

    /// Write the completion flag. `Some(timestamp)` marks completion;
    /// `None` clears it (and the timestamp with it). Creates the row when
    /// absent so a reset is always recordable.
    async fn set_completed(
        &self,
        id: ReservationId,
        stage: HandoffStage,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<(), ChecklistRepositoryError>;
}

/// Fixture implementation: remembers nothing, accepts everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureChecklistRepository;

#[async_trait]
impl ChecklistRepository for FixtureChecklistRepository {
    async fn find(
        &self,
        _id: ReservationId,
        _stage: HandoffStage,
    ) -> Result<Option<ChecklistRecord>, ChecklistRepositoryError> {
        Ok(None)
    }

    async fn upsert_items(
        &self,
        _id: ReservationId,
        _stage: HandoffStage,
        _items: &[ChecklistItem],
    ) -> Result<(), ChecklistRepositoryError> {
        Ok(())
    }

    async fn set_completed(
        &self,
        _id: ReservationId,
        _stage: HandoffStage,
        _completed_at: Option<DateTime<Utc>>,
    ) -> Result<(), ChecklistRepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn photo_count_folds_into_the_aggregate() {
        let record = ChecklistRecord {
            items: vec![ChecklistItem::unchecked("tagged")],
            completed: true,
            completed_at: Some(Utc::now()),
        };
        let checklist = record.with_photo_count(2);
        assert_eq!(checklist.photo_count, 2);
        assert!(checklist.is_satisfied());
    }

    #[tokio::test]
    async fn fixture_lookup_returns_none() {
        let repo = FixtureChecklistRepository;
        let found = repo
            .find(ReservationId::new(1), HandoffStage::PreDropoff)
            .await
            .expect("fixture lookup succeeds");
        assert!(found.is_none());
    }
}
