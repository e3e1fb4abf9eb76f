//! Builders for HTTP state ports and repository-backed services.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ports::{
    BlobStore, ChecklistRepository, FixtureBlobStore, FixtureChecklistRepository,
    FixturePhotoRepository, FixtureReservationRepository, FixtureStageNotifier, PhotoRepository,
    ReservationRepository, StageNotifier,
};
use crate::domain::{AdminStageService, ChecklistService, ChecklistTemplates, PhotoPolicy, ScanService};
use crate::inbound::http::state::HttpState;
use crate::outbound::blobstore::FsBlobStore;
use crate::outbound::notify::LogStageNotifier;
use crate::outbound::persistence::{
    DieselChecklistRepository, DieselPhotoRepository, DieselReservationRepository,
};

use super::ServerConfig;

/// Assemble the HTTP state from one set of concrete adapters.
fn assemble<R, C, P, N, B>(
    reservations: Arc<R>,
    checklists: Arc<C>,
    photos: Arc<P>,
    notifier: Arc<N>,
    blobs: Arc<B>,
) -> web::Data<HttpState>
where
    R: ReservationRepository + 'static,
    C: ChecklistRepository + 'static,
    P: PhotoRepository + 'static,
    N: StageNotifier + 'static,
    B: BlobStore + 'static,
{
    let templates = ChecklistTemplates::default();
    let policy = PhotoPolicy::default();

    let scan = Arc::new(ScanService::new(
        Arc::clone(&reservations),
        Arc::clone(&checklists),
        Arc::clone(&photos),
        Arc::clone(&notifier),
        templates.clone(),
    ));
    let stage_override = Arc::new(AdminStageService::new(Arc::clone(&reservations), notifier));
    let checklist_service = Arc::new(ChecklistService::new(
        reservations, checklists, photos, blobs, templates, policy,
    ));

    web::Data::new(HttpState::new(
        scan,
        stage_override,
        checklist_service.clone(),
        checklist_service,
    ))
}

/// Build the shared HTTP state: Diesel-backed adapters when a pool is
/// configured, in-memory fixtures otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> std::io::Result<web::Data<HttpState>> {
    match &config.db_pool {
        Some(pool) => {
            let blobs = FsBlobStore::open(config.photo_dir()).map_err(|err| {
                std::io::Error::other(format!("photo blob store unavailable: {err}"))
            })?;
            Ok(assemble(
                Arc::new(DieselReservationRepository::new(pool.clone())),
                Arc::new(DieselChecklistRepository::new(pool.clone())),
                Arc::new(DieselPhotoRepository::new(pool.clone())),
                Arc::new(LogStageNotifier),
                Arc::new(blobs),
            ))
        }
        None => Ok(assemble(
            Arc::new(FixtureReservationRepository),
            Arc::new(FixtureChecklistRepository),
            Arc::new(FixturePhotoRepository),
            Arc::new(FixtureStageNotifier),
            Arc::new(FixtureBlobStore),
        )),
    }
}
