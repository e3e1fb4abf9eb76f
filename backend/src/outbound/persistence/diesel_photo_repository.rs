//! PostgreSQL-backed `PhotoRepository` using Diesel.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{NewPhoto, PhotoRepository, PhotoRepositoryError};
use crate::domain::{HandoffStage, PhotoAttachment, PhotoId, ReservationId};

use super::models::{NewPhotoRow, PhotoRow};
use super::pool::{DbPool, PoolError};
use super::schema::reservation_photos;

/// Diesel-backed implementation of the `PhotoRepository` port.
#[derive(Clone)]
pub struct DieselPhotoRepository {
    pool: DbPool,
}

impl DieselPhotoRepository {
    /// Create a repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PhotoRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            PhotoRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> PhotoRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    debug!(error = %error, "diesel operation failed");
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            PhotoRepositoryError::connection("database connection error")
        }
        _ => PhotoRepositoryError::query("database error"),
    }
}

fn row_to_attachment(row: PhotoRow) -> Result<PhotoAttachment, PhotoRepositoryError> {
    let stage = HandoffStage::parse(&row.stage).ok_or_else(|| {
        PhotoRepositoryError::query(format!(
            "photo {} carries unrecognised stage {:?}",
            row.id, row.stage
        ))
    })?;
    Ok(PhotoAttachment {
        id: PhotoId::new(row.id),
        reservation_id: ReservationId::new(row.reservation_id),
        stage,
        content_type: row.content_type,
        byte_size: row.byte_size,
        checksum: row.checksum,
        blob_key: row.blob_key,
        created_at: row.created_at,
    })
}

#[async_trait]
impl PhotoRepository for DieselPhotoRepository {
    async fn insert(&self, photo: &NewPhoto) -> Result<PhotoAttachment, PhotoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewPhotoRow {
            reservation_id: photo.reservation_id.get(),
            stage: photo.stage.as_str(),
            content_type: &photo.content_type,
            byte_size: photo.byte_size,
            checksum: &photo.checksum,
            blob_key: &photo.blob_key,
        };
        let row: PhotoRow = diesel::insert_into(reservation_photos::table)
            .values(&new_row)
            .returning(PhotoRow::as_returning())
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        row_to_attachment(row)
    }

    async fn find(
        &self,
        id: ReservationId,
        stage: HandoffStage,
        photo_id: PhotoId,
    ) -> Result<Option<PhotoAttachment>, PhotoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<PhotoRow> = reservation_photos::table
            .filter(reservation_photos::id.eq(photo_id.get()))
            .filter(reservation_photos::reservation_id.eq(id.get()))
            .filter(reservation_photos::stage.eq(stage.as_str()))
            .select(PhotoRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_attachment).transpose()
    }

    async fn delete(&self, photo_id: PhotoId) -> Result<bool, PhotoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            reservation_photos::table.filter(reservation_photos::id.eq(photo_id.get())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn count(
        &self,
        id: ReservationId,
        stage: HandoffStage,
    ) -> Result<u32, PhotoRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let total: i64 = reservation_photos::table
            .filter(reservation_photos::reservation_id.eq(id.get()))
            .filter(reservation_photos::stage.eq(stage.as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        u32::try_from(total)
            .map_err(|_| PhotoRepositoryError::query("photo count exceeds u32 range"))
    }
}
