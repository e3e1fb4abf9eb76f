//! Pre-validated caller identity and reservation-scoped authorisation.
//!
//! Authentication happens upstream; requests arrive with an [`Actor`]
//! already attached. This module decides what each actor may do to a given
//! reservation.

use std::collections::BTreeSet;

use serde_json::json;

use super::error::Error;
use super::reservation::Reservation;

/// Caller identity as established by the upstream gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    /// Platform administrator; may act on any reservation.
    Admin,
    /// Store staff scoped to one store and the events it runs.
    Store {
        /// The actor's own store.
        store_id: i64,
        /// Events this store operates.
        owned_event_ids: BTreeSet<i64>,
    },
    /// The renting customer.
    Customer {
        /// The actor's customer account.
        customer_id: i64,
    },
}

impl Actor {
    /// Authorise a staff operation (scan, stage override) against a
    /// reservation.
    ///
    /// Administrators pass unconditionally. Store actors must own the
    /// reservation's event *and* match its store; legacy rows without
    /// linked ids never pass store scoping. Customers never pass.
    pub fn authorize_staff(&self, reservation: &Reservation) -> Result<(), Error> {
        match self {
            Self::Admin => Ok(()),
            Self::Store {
                store_id,
                owned_event_ids,
            } => {
                let event_owned = reservation
                    .event_id
                    .is_some_and(|event_id| owned_event_ids.contains(&event_id));
                let store_matches = reservation.store_id == Some(*store_id);
                if event_owned && store_matches {
                    Ok(())
                } else {
                    Err(Self::forbidden(reservation))
                }
            }
            Self::Customer { .. } => Err(Self::forbidden(reservation)),
        }
    }

    /// Authorise an owner operation (checklist update, photo upload or
    /// removal). Only the reservation's customer or an administrator.
    pub fn authorize_owner(&self, reservation: &Reservation) -> Result<(), Error> {
        match self {
            Self::Admin => Ok(()),
            Self::Customer { customer_id } if *customer_id == reservation.customer_id => Ok(()),
            _ => Err(Self::forbidden(reservation)),
        }
    }

    /// Authorise a read shared between the owner and staff (raw photo
    /// fetch, checklist read).
    pub fn authorize_owner_or_staff(&self, reservation: &Reservation) -> Result<(), Error> {
        if self.authorize_owner(reservation).is_ok() {
            return Ok(());
        }
        self.authorize_staff(reservation)
    }

    fn forbidden(reservation: &Reservation) -> Error {
        Error::forbidden("actor is not permitted to act on this reservation")
            .with_details(json!({ "reservationId": reservation.id }))
    }
}
