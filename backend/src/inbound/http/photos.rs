//! Checklist photo endpoints.
//!
//! ```text
//! POST   /reservations/{id}/checklists/{stage}/photos
//! DELETE /reservations/{id}/checklists/{stage}/photos/{photoId}
//! GET    /reservations/{id}/checklists/{stage}/photos/{photoId}/raw
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::PhotoUpload;
use crate::domain::{Checklist, PhotoAttachment, PhotoId, ReservationId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::actor_from_headers;
use crate::inbound::http::error::ApiError;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{missing_field_error, parse_handoff_stage};

/// Photo upload payload.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhotoUploadBody {
    /// Base64 image payload, optionally a full `data:` URL.
    pub data: Option<String>,
    /// Client-supplied display name.
    pub name: Option<String>,
}

/// Attach a photo to a stage's checklist.
#[utoipa::path(
    post,
    path = "/reservations/{id}/checklists/{stage}/photos",
    request_body = PhotoUploadBody,
    params(
        ("id" = i64, Path, description = "Reservation identifier"),
        ("stage" = String, Path, description = "Hand-off stage token")
    ),
    responses(
        (status = 201, description = "Photo stored", body = PhotoAttachment),
        (status = 400, description = "Payload rejected by the upload policy", body = ApiError),
        (status = 403, description = "Caller is not the reservation owner", body = ApiError),
        (status = 404, description = "Reservation does not exist", body = ApiError)
    ),
    tags = ["photos"],
    operation_id = "attachPhoto"
)]
#[post("/reservations/{id}/checklists/{stage}/photos")]
pub async fn attach_photo(
    state: web::Data<HttpState>,
    request: HttpRequest,
    path: web::Path<(i64, String)>,
    payload: web::Json<PhotoUploadBody>,
) -> ApiResult<HttpResponse> {
    let actor = actor_from_headers(request.headers()).map_err(ApiError::from_domain)?;
    let (id, stage) = path.into_inner();
    let stage = parse_handoff_stage(&stage)?;
    let body = payload.into_inner();
    let data = body.data.ok_or_else(|| missing_field_error("data"))?;

    let attachment = state
        .photos
        .attach(
            &actor,
            ReservationId::new(id),
            stage,
            PhotoUpload {
                data,
                name: body.name,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(attachment))
}

/// Remove a photo; returns the checklist after the forced re-derivation.
#[utoipa::path(
    delete,
    path = "/reservations/{id}/checklists/{stage}/photos/{photoId}",
    params(
        ("id" = i64, Path, description = "Reservation identifier"),
        ("stage" = String, Path, description = "Hand-off stage token"),
        ("photoId" = i64, Path, description = "Photo identifier")
    ),
    responses(
        (status = 200, description = "Checklist after removal", body = Checklist),
        (status = 403, description = "Caller is not the reservation owner", body = ApiError),
        (status = 404, description = "Reservation or photo does not exist", body = ApiError)
    ),
    tags = ["photos"],
    operation_id = "detachPhoto"
)]
#[delete("/reservations/{id}/checklists/{stage}/photos/{photo_id}")]
pub async fn detach_photo(
    state: web::Data<HttpState>,
    request: HttpRequest,
    path: web::Path<(i64, String, i64)>,
) -> ApiResult<web::Json<Checklist>> {
    let actor = actor_from_headers(request.headers()).map_err(ApiError::from_domain)?;
    let (id, stage, photo_id) = path.into_inner();
    let stage = parse_handoff_stage(&stage)?;

    let checklist = state
        .photos
        .detach(&actor, ReservationId::new(id), stage, PhotoId::new(photo_id))
        .await?;
    Ok(web::Json(checklist))
}

/// Stream a photo's stored bytes with its sniffed MIME type.
#[utoipa::path(
    get,
    path = "/reservations/{id}/checklists/{stage}/photos/{photoId}/raw",
    params(
        ("id" = i64, Path, description = "Reservation identifier"),
        ("stage" = String, Path, description = "Hand-off stage token"),
        ("photoId" = i64, Path, description = "Photo identifier")
    ),
    responses(
        (status = 200, description = "Image bytes", content_type = "image/*"),
        (status = 403, description = "Caller may not read this reservation", body = ApiError),
        (status = 404, description = "Reservation or photo does not exist", body = ApiError)
    ),
    tags = ["photos"],
    operation_id = "getPhotoRaw"
)]
#[get("/reservations/{id}/checklists/{stage}/photos/{photo_id}/raw")]
pub async fn photo_raw(
    state: web::Data<HttpState>,
    request: HttpRequest,
    path: web::Path<(i64, String, i64)>,
) -> ApiResult<HttpResponse> {
    let actor = actor_from_headers(request.headers()).map_err(ApiError::from_domain)?;
    let (id, stage, photo_id) = path.into_inner();
    let stage = parse_handoff_stage(&stage)?;

    let raw = state
        .photos
        .fetch_raw(&actor, ReservationId::new(id), stage, PhotoId::new(photo_id))
        .await?;
    Ok(HttpResponse::Ok()
        .content_type(raw.content_type)
        .body(raw.bytes))
}
