//! Owner-facing checklist endpoints.
//!
//! ```text
//! GET   /reservations/{id}/checklists/{stage}
//! PATCH /reservations/{id}/checklists/{stage}
//! ```

use actix_web::{HttpRequest, get, patch, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::ChecklistUpdate;
use crate::domain::{Checklist, ChecklistItem, ReservationId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::actor_from_headers;
use crate::inbound::http::error::ApiError;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_handoff_stage;

/// Partial checklist update payload; absent fields are left untouched.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChecklistUpdateBody {
    /// Replacement item list.
    pub items: Option<Vec<ChecklistItem>>,
    /// New completion flag. `true` is gated on a present photo and fully
    /// checked items; `false` always succeeds.
    pub completed: Option<bool>,
}

/// Fetch the current checklist for a (reservation, stage) pair.
#[utoipa::path(
    get,
    path = "/reservations/{id}/checklists/{stage}",
    params(
        ("id" = i64, Path, description = "Reservation identifier"),
        ("stage" = String, Path, description = "Hand-off stage token")
    ),
    responses(
        (status = 200, description = "Current checklist", body = Checklist),
        (status = 400, description = "Stage token invalid or carries no checklist", body = ApiError),
        (status = 403, description = "Caller may not read this reservation", body = ApiError),
        (status = 404, description = "Reservation does not exist", body = ApiError)
    ),
    tags = ["checklists"],
    operation_id = "getChecklist"
)]
#[get("/reservations/{id}/checklists/{stage}")]
pub async fn get_checklist(
    state: web::Data<HttpState>,
    request: HttpRequest,
    path: web::Path<(i64, String)>,
) -> ApiResult<web::Json<Checklist>> {
    let actor = actor_from_headers(request.headers()).map_err(ApiError::from_domain)?;
    let (id, stage) = path.into_inner();
    let stage = parse_handoff_stage(&stage)?;

    let checklist = state
        .checklists
        .fetch(&actor, ReservationId::new(id), stage)
        .await?;
    Ok(web::Json(checklist))
}

/// Apply a partial checklist update.
#[utoipa::path(
    patch,
    path = "/reservations/{id}/checklists/{stage}",
    request_body = ChecklistUpdateBody,
    params(
        ("id" = i64, Path, description = "Reservation identifier"),
        ("stage" = String, Path, description = "Hand-off stage token")
    ),
    responses(
        (status = 200, description = "Resulting checklist", body = Checklist),
        (status = 400, description = "Completion gate failed or payload invalid", body = ApiError),
        (status = 403, description = "Caller is not the reservation owner", body = ApiError),
        (status = 404, description = "Reservation does not exist", body = ApiError)
    ),
    tags = ["checklists"],
    operation_id = "updateChecklist"
)]
#[patch("/reservations/{id}/checklists/{stage}")]
pub async fn update_checklist(
    state: web::Data<HttpState>,
    request: HttpRequest,
    path: web::Path<(i64, String)>,
    payload: web::Json<ChecklistUpdateBody>,
) -> ApiResult<web::Json<Checklist>> {
    let actor = actor_from_headers(request.headers()).map_err(ApiError::from_domain)?;
    let (id, stage) = path.into_inner();
    let stage = parse_handoff_stage(&stage)?;
    let body = payload.into_inner();

    let checklist = state
        .checklists
        .update(
            &actor,
            ReservationId::new(id),
            stage,
            ChecklistUpdate {
                items: body.items,
                completed: body.completed,
            },
        )
        .await?;
    Ok(web::Json(checklist))
}
