//! PostgreSQL-backed `ReservationRepository` using Diesel.
//!
//! The two correctness-critical operations live here:
//!
//! - code assignment is an `ON CONFLICT DO NOTHING` insert against the
//!   code primary key, so the global-uniqueness invariant is enforced by
//!   the store rather than by a read-then-write;
//! - stage advancement is a single conditional `UPDATE` whose predicate
//!   accepts the expected stage token and its legacy aliases. The race
//!   loser observes zero updated rows.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::ports::{
    CodeBinding, ReservationRepository, ReservationRepositoryError, StageWrite,
};
use crate::domain::{
    HandoffStage, Reservation, ReservationId, Stage, StageCodes, VerificationCode,
};

use super::models::{CodeRow, NewCodeRow, ReservationRow};
use super::pool::{DbPool, PoolError};
use super::schema::{reservations, verification_codes};

/// Diesel-backed implementation of the `ReservationRepository` port.
#[derive(Clone)]
pub struct DieselReservationRepository {
    pool: DbPool,
}

impl DieselReservationRepository {
    /// Create a repository over the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReservationRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ReservationRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ReservationRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(error = %other, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ReservationRepositoryError::connection("database connection error")
        }
        DieselError::NotFound => ReservationRepositoryError::query("record not found"),
        _ => ReservationRepositoryError::query("database error"),
    }
}

/// Convert a stored row into the domain aggregate, normalising legacy
/// stage tokens.
fn row_to_reservation(row: ReservationRow) -> Result<Reservation, ReservationRepositoryError> {
    let stage = Stage::parse(&row.stage).ok_or_else(|| {
        ReservationRepositoryError::query(format!(
            "reservation {} carries unrecognised stage {:?}",
            row.id, row.stage
        ))
    })?;
    Ok(Reservation {
        id: ReservationId::new(row.id),
        customer_id: row.customer_id,
        event_id: row.event_id,
        store_id: row.store_id,
        event_name: row.event_name,
        store_name: row.store_name,
        stage,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn row_to_binding(row: &CodeRow) -> Result<CodeBinding, ReservationRepositoryError> {
    let stage = HandoffStage::parse(&row.stage).ok_or_else(|| {
        ReservationRepositoryError::query(format!(
            "code {} carries unrecognised stage {:?}",
            row.code, row.stage
        ))
    })?;
    Ok(CodeBinding {
        reservation_id: ReservationId::new(row.reservation_id),
        stage,
    })
}

impl DieselReservationRepository {
    /// The code currently occupying a (reservation, stage) slot, if any.
    async fn slot_occupant(
        &self,
        id: ReservationId,
        stage: HandoffStage,
    ) -> Result<Option<VerificationCode>, ReservationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CodeRow> = verification_codes::table
            .filter(verification_codes::reservation_id.eq(id.get()))
            .filter(verification_codes::stage.eq(stage.as_str()))
            .select(CodeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(|row| {
            VerificationCode::parse(&row.code).map_err(|_| {
                ReservationRepositoryError::query(format!(
                    "stored code {:?} fails validation",
                    row.code
                ))
            })
        })
        .transpose()
    }
}

#[async_trait]
impl ReservationRepository for DieselReservationRepository {
    async fn find_by_id(
        &self,
        id: ReservationId,
    ) -> Result<Option<Reservation>, ReservationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<ReservationRow> = reservations::table
            .find(id.get())
            .select(ReservationRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_reservation).transpose()
    }

    async fn resolve_code(
        &self,
        code: &VerificationCode,
    ) -> Result<Option<CodeBinding>, ReservationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<CodeRow> = verification_codes::table
            .find(code.as_str())
            .select(CodeRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.as_ref().map(row_to_binding).transpose()
    }

    async fn stage_codes(
        &self,
        id: ReservationId,
    ) -> Result<StageCodes, ReservationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<CodeRow> = verification_codes::table
            .filter(verification_codes::reservation_id.eq(id.get()))
            .select(CodeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        let mut codes = StageCodes::default();
        for row in rows {
            let binding = row_to_binding(&row)?;
            let code = VerificationCode::parse(&row.code).map_err(|_| {
                ReservationRepositoryError::query(format!(
                    "stored code {:?} fails validation",
                    row.code
                ))
            })?;
            codes.set_if_absent(binding.stage, code);
        }
        Ok(codes)
    }

    async fn assign_code_if_absent(
        &self,
        id: ReservationId,
        stage: HandoffStage,
        candidate: &VerificationCode,
    ) -> Result<VerificationCode, ReservationRepositoryError> {
        use diesel::result::{DatabaseErrorKind, Error as DieselError};

        if let Some(existing) = self.slot_occupant(id, stage).await? {
            return Ok(existing);
        }

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewCodeRow {
            code: candidate.as_str(),
            reservation_id: id.get(),
            stage: stage.as_str(),
        };
        let inserted = diesel::insert_into(verification_codes::table)
            .values(&new_row)
            .on_conflict(verification_codes::code)
            .do_nothing()
            .execute(&mut conn)
            .await;
        drop(conn);

        match inserted {
            // The candidate claimed the code namespace and the slot.
            Ok(1) => Ok(candidate.clone()),
            // The code primary key already exists elsewhere; redraw.
            Ok(_) => Err(ReservationRepositoryError::code_taken(candidate.as_str())),
            // A concurrent writer filled this slot with a different code
            // between our read and the insert; converge on theirs.
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => self
                .slot_occupant(id, stage)
                .await?
                .ok_or_else(|| ReservationRepositoryError::code_taken(candidate.as_str())),
            Err(err) => Err(map_diesel_error(err)),
        }
    }

    async fn advance_stage(
        &self,
        id: ReservationId,
        expected: HandoffStage,
        next: Stage,
    ) -> Result<StageWrite, ReservationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(reservations::table)
            .filter(reservations::id.eq(id.get()))
            .filter(reservations::stage.eq_any(expected.stage().accepted_tokens()))
            .set((
                reservations::stage.eq(next.as_str()),
                reservations::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(if updated == 1 {
            StageWrite::Advanced
        } else {
            StageWrite::StaleStage
        })
    }

    async fn set_stage(
        &self,
        id: ReservationId,
        stage: Stage,
    ) -> Result<(), ReservationRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let updated = diesel::update(reservations::table)
            .filter(reservations::id.eq(id.get()))
            .set((
                reservations::stage.eq(stage.as_str()),
                reservations::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        if updated == 0 {
            return Err(ReservationRepositoryError::query(
                "reservation not found for stage write",
            ));
        }
        Ok(())
    }
}
