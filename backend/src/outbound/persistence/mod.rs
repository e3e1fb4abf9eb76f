//! PostgreSQL persistence adapters built on Diesel and `diesel-async`.

pub mod diesel_checklist_repository;
pub mod diesel_photo_repository;
pub mod diesel_reservation_repository;
pub mod models;
pub mod pool;
pub mod schema;

pub use diesel_checklist_repository::DieselChecklistRepository;
pub use diesel_photo_repository::DieselPhotoRepository;
pub use diesel_reservation_repository::DieselReservationRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
