//! Actor extraction from trusted gateway headers.
//!
//! Authentication happens upstream; the gateway forwards the verified
//! identity in `x-actor-*` headers. A request without a well-formed
//! identity is refused outright, the same as a failed authorisation check,
//! so probing clients cannot distinguish the two.
//!
//! ```text
//! x-actor-role: admin | store | customer
//! x-actor-store-id: 42            (store only)
//! x-actor-event-ids: 7,9,13       (store only, may be empty)
//! x-actor-customer-id: 1001       (customer only)
//! ```

use std::collections::BTreeSet;

use actix_web::dev::Payload;
use actix_web::http::header::HeaderMap;
use actix_web::{FromRequest, HttpRequest};
use futures_util::future::{Ready, ready};

use crate::domain::{Actor, Error};
use crate::inbound::http::error::ApiError;

const ROLE_HEADER: &str = "x-actor-role";
const STORE_ID_HEADER: &str = "x-actor-store-id";
const EVENT_IDS_HEADER: &str = "x-actor-event-ids";
const CUSTOMER_ID_HEADER: &str = "x-actor-customer-id";

fn identity_error() -> Error {
    Error::forbidden("caller identity is missing or malformed")
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, Error> {
    headers
        .get(name)
        .ok_or_else(identity_error)?
        .to_str()
        .map_err(|_| identity_error())
}

fn parse_i64(raw: &str) -> Result<i64, Error> {
    raw.trim().parse().map_err(|_| identity_error())
}

fn parse_event_ids(raw: &str) -> Result<BTreeSet<i64>, Error> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse().map_err(|_| identity_error()))
        .collect()
}

/// Parse the forwarded identity headers into an [`Actor`].
pub fn actor_from_headers(headers: &HeaderMap) -> Result<Actor, Error> {
    match header_str(headers, ROLE_HEADER)? {
        "admin" => Ok(Actor::Admin),
        "store" => Ok(Actor::Store {
            store_id: parse_i64(header_str(headers, STORE_ID_HEADER)?)?,
            owned_event_ids: match headers.get(EVENT_IDS_HEADER) {
                Some(value) => {
                    parse_event_ids(value.to_str().map_err(|_| identity_error())?)?
                }
                None => BTreeSet::new(),
            },
        }),
        "customer" => Ok(Actor::Customer {
            customer_id: parse_i64(header_str(headers, CUSTOMER_ID_HEADER)?)?,
        }),
        _ => Err(identity_error()),
    }
}

impl FromRequest for Actor {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(actor_from_headers(req.headers()).map_err(ApiError::from_domain))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use rstest::rstest;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut request = TestRequest::default();
        for (name, value) in pairs {
            request = request.insert_header((*name, *value));
        }
        request.to_http_request().headers().clone()
    }

    #[rstest]
    fn admin_role_needs_no_other_headers() {
        let actor = actor_from_headers(&headers(&[("x-actor-role", "admin")]))
            .expect("admin parses");
        assert_eq!(actor, Actor::Admin);
    }

    #[rstest]
    fn store_role_carries_store_and_events() {
        let actor = actor_from_headers(&headers(&[
            ("x-actor-role", "store"),
            ("x-actor-store-id", "4"),
            ("x-actor-event-ids", "7, 9,13"),
        ]))
        .expect("store parses");
        assert_eq!(
            actor,
            Actor::Store {
                store_id: 4,
                owned_event_ids: [7, 9, 13].into_iter().collect(),
            }
        );
    }

    #[rstest]
    fn store_role_without_events_owns_nothing() {
        let actor = actor_from_headers(&headers(&[
            ("x-actor-role", "store"),
            ("x-actor-store-id", "4"),
        ]))
        .expect("store parses");
        assert_eq!(
            actor,
            Actor::Store {
                store_id: 4,
                owned_event_ids: BTreeSet::new(),
            }
        );
    }

    #[rstest]
    fn customer_role_carries_the_customer_id() {
        let actor = actor_from_headers(&headers(&[
            ("x-actor-role", "customer"),
            ("x-actor-customer-id", "1001"),
        ]))
        .expect("customer parses");
        assert_eq!(actor, Actor::Customer { customer_id: 1001 });
    }

    #[rstest]
    #[case(&[])]
    #[case(&[("x-actor-role", "root")])]
    #[case(&[("x-actor-role", "store")])]
    #[case(&[("x-actor-role", "store"), ("x-actor-store-id", "abc")])]
    #[case(&[("x-actor-role", "customer")])]
    #[case(&[("x-actor-role", "store"), ("x-actor-store-id", "4"), ("x-actor-event-ids", "7,x")])]
    fn malformed_identities_are_refused(#[case] pairs: &[(&str, &str)]) {
        let error = actor_from_headers(&headers(pairs)).expect_err("refused");
        assert_eq!(error.code(), crate::domain::ErrorCode::Forbidden);
    }
}
