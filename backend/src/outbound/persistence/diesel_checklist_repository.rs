//! PostgreSQL-backed `ChecklistRepository` using Diesel.
//!
//! Items are persisted as a JSONB array of `{label, checked}` objects.
//! Both writes are upserts against the `(reservation_id, stage)` unique
//! constraint so callers never need to know whether a row exists yet.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{ChecklistRecord, ChecklistRepository, ChecklistRepositoryError};
use crate::domain::{ChecklistItem, HandoffStage, ReservationId};

use super::models::{ChecklistRow, NewChecklistRow};
use super::pool::{DbPool, PoolError};
use super::schema::reservation_checklists;

/// Diesel-backed implementation of the `ChecklistRepository` port.
#[derive(Clone)]
pub struct DieselChecklistRepository {
    pool: DbPool,
}

impl DieselChecklistRepository {
    /// Create a repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ChecklistRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ChecklistRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ChecklistRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    debug!(error = %error, "diesel operation failed");
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ChecklistRepositoryError::connection("database connection error")
        }
        _ => ChecklistRepositoryError::query("database error"),
    }
}

fn row_to_record(row: ChecklistRow) -> Result<ChecklistRecord, ChecklistRepositoryError> {
    let items: Vec<ChecklistItem> = serde_json::from_value(row.items).map_err(|err| {
        ChecklistRepositoryError::query(format!(
            "checklist items for reservation {} failed to decode: {err}",
            row.reservation_id
        ))
    })?;
    Ok(ChecklistRecord {
        items,
        completed: row.completed,
        completed_at: row.completed_at,
    })
}

fn items_to_json(items: &[ChecklistItem]) -> Result<serde_json::Value, ChecklistRepositoryError> {
    serde_json::to_value(items)
        .map_err(|err| ChecklistRepositoryError::query(format!("checklist items encode: {err}")))
}

#[async_trait]
impl ChecklistRepository for DieselChecklistRepository {
    async fn find(
        &self,
        id: ReservationId,
        stage: HandoffStage,
    ) -> Result<Option<ChecklistRecord>, ChecklistRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ChecklistRow> = reservation_checklists::table
            .filter(reservation_checklists::reservation_id.eq(id.get()))
            .filter(reservation_checklists::stage.eq(stage.as_str()))
            .select(ChecklistRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_record).transpose()
    }

    async fn upsert_items(
        &self,
        id: ReservationId,
        stage: HandoffStage,
        items: &[ChecklistItem],
    ) -> Result<(), ChecklistRepositoryError> {
        let encoded = items_to_json(items)?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewChecklistRow {
            reservation_id: id.get(),
            stage: stage.as_str(),
            items: encoded.clone(),
            completed: false,
            completed_at: None,
        };
        diesel::insert_into(reservation_checklists::table)
            .values(&new_row)
            .on_conflict((
                reservation_checklists::reservation_id,
                reservation_checklists::stage,
            ))
            .do_update()
            .set((
                reservation_checklists::items.eq(encoded),
                reservation_checklists::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }

    async fn set_completed(
        &self,
        id: ReservationId,
        stage: HandoffStage,
        completed_at: Option<DateTime<Utc>>,
    ) -> Result<(), ChecklistRepositoryError> {
        let completed = completed_at.is_some();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewChecklistRow {
            reservation_id: id.get(),
            stage: stage.as_str(),
            items: serde_json::Value::Array(Vec::new()),
            completed,
            completed_at,
        };
        diesel::insert_into(reservation_checklists::table)
            .values(&new_row)
            .on_conflict((
                reservation_checklists::reservation_id,
                reservation_checklists::stage,
            ))
            .do_update()
            .set((
                reservation_checklists::completed.eq(completed),
                reservation_checklists::completed_at.eq(completed_at),
                reservation_checklists::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(())
    }
}
