//! HTTP inbound adapter exposing the REST surface.

pub mod auth;
pub mod checklists;
pub mod error;
pub mod health;
pub mod photos;
pub mod reservations;
pub mod scan;
pub mod state;
pub mod validation;

use actix_web::web;

pub use error::{ApiError, ApiResult};
pub use state::HttpState;

/// Register every application route. Health probes are registered
/// separately because they carry their own state.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(scan::progress_scan)
        .service(reservations::set_status)
        .service(checklists::get_checklist)
        .service(checklists::update_checklist)
        .service(photos::attach_photo)
        .service(photos::detach_photo)
        .service(photos::photo_raw);
}
