//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{Error, HandoffStage, Stage};

/// Validation failure for a missing request field.
pub(crate) fn missing_field_error(field: &'static str) -> Error {
    Error::validation(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

/// Parse a lifecycle stage token (any of the six values, aliases
/// normalised).
pub(crate) fn parse_stage(raw: &str) -> Result<Stage, Error> {
    Stage::parse(raw).ok_or_else(|| {
        Error::validation("unknown reservation stage").with_details(json!({
            "field": "status",
            "value": raw,
            "code": "invalid_stage",
        }))
    })
}

/// Parse a path segment naming a hand-off stage. `done` is a valid
/// lifecycle stage but carries no checklist, so addressing it is a stage
/// mismatch rather than a validation failure.
pub(crate) fn parse_handoff_stage(raw: &str) -> Result<HandoffStage, Error> {
    match Stage::parse(raw) {
        None => Err(Error::validation("unknown reservation stage").with_details(json!({
            "field": "stage",
            "value": raw,
            "code": "invalid_stage",
        }))),
        Some(stage) => HandoffStage::try_from(stage).map_err(|_| {
            Error::code_stage_mismatch("stage carries no checklist")
                .with_details(json!({ "stage": stage }))
        }),
    }
}
