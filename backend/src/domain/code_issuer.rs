//! Verification-code issuance with persistence-time collision handling.
//!
//! Generation and persistence are not atomic by themselves: another
//! request can claim a freshly drawn code between the draw and the write.
//! The issuer therefore treats the conditional insert as the uniqueness
//! check, redrawing whenever the store reports the candidate as taken.

use std::sync::Arc;

use tracing::debug;

use super::code::VerificationCode;
use super::error::Error;
use super::ports::{ReservationRepository, ReservationRepositoryError};
use super::reservation::ReservationId;
use super::stage::HandoffStage;

/// Upper bound on redraws before giving up. The 6-digit space holds a
/// million values; hitting this bound means the store is effectively full
/// or misbehaving.
const MAX_DRAW_ATTEMPTS: u32 = 16;

/// Issues verification codes satisfying the global-uniqueness invariant.
#[derive(Clone)]
pub struct CodeIssuer<R> {
    reservations: Arc<R>,
}

impl<R> CodeIssuer<R> {
    /// Create an issuer backed by the given repository.
    pub fn new(reservations: Arc<R>) -> Self {
        Self { reservations }
    }
}

impl<R: ReservationRepository> CodeIssuer<R> {
    /// Ensure the (reservation, stage) slot holds a code, drawing and
    /// persisting one if necessary, and return the slot's occupant.
    ///
    /// Idempotent: when the slot is already filled the existing code is
    /// returned and the candidate is discarded.
    pub async fn issue(
        &self,
        id: ReservationId,
        stage: HandoffStage,
    ) -> Result<VerificationCode, Error> {
        for attempt in 1..=MAX_DRAW_ATTEMPTS {
            let candidate = VerificationCode::random(&mut rand::thread_rng());
            match self
                .reservations
                .assign_code_if_absent(id, stage, &candidate)
                .await
            {
                Ok(code) => return Ok(code),
                Err(ReservationRepositoryError::CodeTaken { code }) => {
                    debug!(%id, %stage, attempt, code, "code collision, redrawing");
                }
                Err(err) => return Err(map_repository_error(err)),
            }
        }
        Err(Error::internal(
            "verification code namespace exhausted redraw attempts",
        ))
    }
}

fn map_repository_error(error: ReservationRepositoryError) -> Error {
    match error {
        ReservationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("reservation repository unavailable: {message}"))
        }
        ReservationRepositoryError::Query { message } => {
            Error::internal(format!("reservation repository error: {message}"))
        }
        ReservationRepositoryError::CodeTaken { code } => {
            Error::internal(format!("unexpected code collision for {code}"))
        }
    }
}
