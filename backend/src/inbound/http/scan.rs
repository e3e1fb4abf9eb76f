//! Staff scan endpoint.
//!
//! ```text
//! POST /admin/reservations/progress_scan
//! ```
//!
//! One endpoint serves both phases of the protocol: `confirm` absent or
//! false returns a preview with `needsConfirmation: true`; `confirm: true`
//! commits the transition.

use actix_web::{HttpRequest, HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::{ScanOutcome, ScanPreview, ScanRequest, ScanTransition};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::actor_from_headers;
use crate::inbound::http::error::ApiError;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::missing_field_error;

/// Request payload for a staff scan.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanRequestBody {
    /// The scanned verification code.
    pub code: Option<String>,
    /// Commit the transition instead of previewing it.
    #[serde(default)]
    pub confirm: Option<bool>,
}

/// Preview response; nothing has been mutated.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanPreviewResponse {
    /// Always `true`: the caller must re-send with `confirm` to commit.
    pub needs_confirmation: bool,
    #[serde(flatten)]
    #[schema(inline)]
    pub preview: ScanPreview,
}

/// Committed transition response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScanTransitionResponse {
    /// Always `false`: the transition has been committed.
    pub needs_confirmation: bool,
    #[serde(flatten)]
    #[schema(inline)]
    pub transition: ScanTransition,
}

/// Execute one phase of the two-phase scan protocol.
#[utoipa::path(
    post,
    path = "/admin/reservations/progress_scan",
    request_body = ScanRequestBody,
    responses(
        (status = 200, description = "Preview or committed transition"),
        (status = 403, description = "Caller may not act on this reservation", body = ApiError),
        (status = 404, description = "Unknown verification code", body = ApiError),
        (status = 409, description = "Stage moved since the code was scanned", body = ApiError),
        (status = 422, description = "Checklist gate not satisfied", body = ApiError)
    ),
    tags = ["scan"],
    operation_id = "progressScan"
)]
#[post("/admin/reservations/progress_scan")]
pub async fn progress_scan(
    state: web::Data<HttpState>,
    request: HttpRequest,
    payload: web::Json<ScanRequestBody>,
) -> ApiResult<HttpResponse> {
    let actor = actor_from_headers(request.headers()).map_err(ApiError::from_domain)?;
    let body = payload.into_inner();
    let code = body.code.ok_or_else(|| missing_field_error("code"))?;

    let outcome = state
        .scan
        .scan(
            &actor,
            ScanRequest {
                code,
                confirm: body.confirm.unwrap_or(false),
            },
        )
        .await?;

    Ok(match outcome {
        ScanOutcome::Preview(preview) => HttpResponse::Ok().json(ScanPreviewResponse {
            needs_confirmation: true,
            preview,
        }),
        ScanOutcome::Committed(transition) => HttpResponse::Ok().json(ScanTransitionResponse {
            needs_confirmation: false,
            transition,
        }),
    })
}
