//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ChecklistAccess, PhotoAccess, ScanWorkflow, StageOverrideCommand};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Two-phase staff scan workflow.
    pub scan: Arc<dyn ScanWorkflow>,
    /// Administrative stage override.
    pub stage_override: Arc<dyn StageOverrideCommand>,
    /// Owner-facing checklist reads and updates.
    pub checklists: Arc<dyn ChecklistAccess>,
    /// Photo attach/detach/raw fetch.
    pub photos: Arc<dyn PhotoAccess>,
}

impl HttpState {
    /// Bundle the driving ports for handler registration.
    pub fn new(
        scan: Arc<dyn ScanWorkflow>,
        stage_override: Arc<dyn StageOverrideCommand>,
        checklists: Arc<dyn ChecklistAccess>,
        photos: Arc<dyn PhotoAccess>,
    ) -> Self {
        Self {
            scan,
            stage_override,
            checklists,
            photos,
        }
    }
}
