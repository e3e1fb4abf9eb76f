//! Administrative reservation stage override endpoint.
//!
//! ```text
//! PATCH /admin/reservations/{id}/status
//! ```

use actix_web::{HttpRequest, patch, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ReservationId;
use crate::domain::ports::StageOverrideOutcome;
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::actor_from_headers;
use crate::inbound::http::error::ApiError;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field_error, parse_stage};

/// Request payload for a direct stage set.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetStatusBody {
    /// Target stage token; legacy aliases are accepted and normalised.
    pub status: Option<String>,
}

/// Set a reservation's lifecycle stage directly, bypassing the checklist
/// gate. Audited.
#[utoipa::path(
    patch,
    path = "/admin/reservations/{id}/status",
    request_body = SetStatusBody,
    params(("id" = i64, Path, description = "Reservation identifier")),
    responses(
        (status = 200, description = "Stage overridden", body = StageOverrideOutcome),
        (status = 400, description = "Unknown stage token", body = ApiError),
        (status = 403, description = "Caller may not act on this reservation", body = ApiError),
        (status = 404, description = "Reservation does not exist", body = ApiError)
    ),
    tags = ["admin"],
    operation_id = "setReservationStatus"
)]
#[patch("/admin/reservations/{id}/status")]
pub async fn set_status(
    state: web::Data<HttpState>,
    request: HttpRequest,
    path: web::Path<i64>,
    payload: web::Json<SetStatusBody>,
) -> ApiResult<web::Json<StageOverrideOutcome>> {
    let actor = actor_from_headers(request.headers()).map_err(ApiError::from_domain)?;
    let status = payload
        .into_inner()
        .status
        .ok_or_else(|| missing_field_error("status"))?;
    let target = parse_stage(&status)?;

    let outcome = state
        .stage_override
        .set_stage(&actor, ReservationId::new(path.into_inner()), target)
        .await?;
    Ok(web::Json(outcome))
}
