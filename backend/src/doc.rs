//! OpenAPI documentation configuration.
//!
//! Defines the [`ApiDoc`] struct generating the OpenAPI specification for
//! the REST API: scan protocol, administrative overrides, checklists,
//! photos, and health probes. Swagger UI serves the document in debug
//! builds only.

use utoipa::OpenApi;

use crate::domain::ports::{ScanPreview, ScanTransition, StageOverrideOutcome};
use crate::domain::{
    Checklist, ChecklistItem, ErrorCode, HandoffStage, PhotoAttachment, PhotoId, ReservationId,
    ReservationSummary, Stage, VerificationCode,
};
use crate::inbound::http::checklists::ChecklistUpdateBody;
use crate::inbound::http::error::ApiError;
use crate::inbound::http::photos::PhotoUploadBody;
use crate::inbound::http::reservations::SetStatusBody;
use crate::inbound::http::scan::{ScanPreviewResponse, ScanRequestBody, ScanTransitionResponse};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gearpass backend API",
        description = "Code-verified, checklist-gated hand-off lifecycle for \
                       rented event equipment."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::scan::progress_scan,
        crate::inbound::http::reservations::set_status,
        crate::inbound::http::checklists::get_checklist,
        crate::inbound::http::checklists::update_checklist,
        crate::inbound::http::photos::attach_photo,
        crate::inbound::http::photos::detach_photo,
        crate::inbound::http::photos::photo_raw,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ApiError,
        ErrorCode,
        Stage,
        HandoffStage,
        VerificationCode,
        ReservationId,
        ReservationSummary,
        Checklist,
        ChecklistItem,
        ChecklistUpdateBody,
        PhotoAttachment,
        PhotoId,
        PhotoUploadBody,
        ScanRequestBody,
        ScanPreview,
        ScanPreviewResponse,
        ScanTransition,
        ScanTransitionResponse,
        SetStatusBody,
        StageOverrideOutcome,
    )),
    tags(
        (name = "scan", description = "Two-phase staff scan protocol"),
        (name = "admin", description = "Administrative stage control"),
        (name = "checklists", description = "Per-stage hand-off checklists"),
        (name = "photos", description = "Checklist photo evidence"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_error_schema_has_envelope_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("ApiError").expect("ApiError schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[test]
    fn openapi_registers_the_scan_path() {
        let doc = ApiDoc::openapi();
        assert!(
            doc.paths
                .paths
                .contains_key("/admin/reservations/progress_scan")
        );
    }
}
