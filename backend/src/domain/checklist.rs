//! Per-stage checklists gating stage transitions.
//!
//! Each (reservation, hand-off stage) pair carries one checklist: labelled
//! boolean items, an explicit completion flag with timestamp, and a derived
//! count of attached photos. [`Checklist::is_satisfied`] is the sole gate
//! predicate consulted before a transition; nothing else may recompute it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::stage::HandoffStage;

/// One labelled boolean checklist entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistItem {
    /// Display label sourced from the per-stage template.
    pub label: String,
    /// Whether staff or the customer ticked the entry.
    pub checked: bool,
}

impl ChecklistItem {
    /// Construct an unchecked item with the given label.
    pub fn unchecked(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            checked: false,
        }
    }
}

/// Checklist state for one (reservation, stage) pair, photo count included.
///
/// ## Invariants
/// - `completed` only becomes `true` through an explicit update made while
///   `photo_count > 0` and every item is checked.
/// - `completed_at` is `Some` exactly when `completed` is `true`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Checklist {
    /// Ordered items; a zero-length list is valid.
    pub items: Vec<ChecklistItem>,
    /// Explicit completion flag set by the owner.
    pub completed: bool,
    /// When the completion flag was last set.
    pub completed_at: Option<DateTime<Utc>>,
    /// Number of photo attachments currently stored for this stage.
    pub photo_count: u32,
}

impl Checklist {
    /// A fresh checklist carrying the given template items, nothing checked.
    pub fn from_template(labels: &[String]) -> Self {
        Self {
            items: labels
                .iter()
                .map(|label| ChecklistItem::unchecked(label.clone()))
                .collect(),
            completed: false,
            completed_at: None,
            photo_count: 0,
        }
    }

    /// Whether every item is checked. Vacuously true for an empty list.
    pub fn all_items_checked(&self) -> bool {
        self.items.iter().all(|item| item.checked)
    }

    /// The checklist gate: explicit completion plus at least one photo.
    ///
    /// # Examples
    /// ```
    /// use gearpass::domain::Checklist;
    ///
    /// let mut checklist = Checklist::from_template(&[]);
    /// assert!(!checklist.is_satisfied());
    /// checklist.completed = true;
    /// checklist.photo_count = 1;
    /// assert!(checklist.is_satisfied());
    /// ```
    pub fn is_satisfied(&self) -> bool {
        self.completed && self.photo_count > 0
    }
}

/// Configurable per-stage checklist item labels.
///
/// Stores override the built-in defaults per hand-off stage; a stage mapped
/// to an empty list yields a blank (still valid) checklist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChecklistTemplates {
    labels: HashMap<HandoffStage, Vec<String>>,
}

impl ChecklistTemplates {
    /// Build templates from an explicit per-stage label map; stages absent
    /// from the map fall back to the built-in defaults at lookup time.
    pub fn new(labels: HashMap<HandoffStage, Vec<String>>) -> Self {
        Self { labels }
    }

    /// Item labels for the given stage.
    pub fn labels_for(&self, stage: HandoffStage) -> Vec<String> {
        self.labels
            .get(&stage)
            .cloned()
            .unwrap_or_else(|| default_labels(stage))
    }
}

fn default_labels(stage: HandoffStage) -> Vec<String> {
    let labels: &[&str] = match stage {
        HandoffStage::PreDropoff => &[
            "All rented items present",
            "Equipment condition photographed",
            "Storage tag attached",
        ],
        HandoffStage::PrePickup => &[
            "Identity confirmed against reservation",
            "Equipment handed over complete",
        ],
        HandoffStage::PostDropoff => &[
            "Returned items match the hand-over list",
            "Damage inspection performed",
        ],
        HandoffStage::PostPickup => &[
            "Personal items returned",
            "Customer confirmed nothing left behind",
        ],
    };
    labels.iter().map(|label| (*label).to_owned()).collect()
}
