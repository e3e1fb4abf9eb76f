//! Gearpass backend library modules.
//!
//! Hexagonal layout: `domain` holds the lifecycle rules and ports,
//! `inbound` the HTTP adapters, `outbound` the persistence, blob, and
//! notification adapters, and `server` the wiring between them.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
/// Request tracing middleware applied to every route.
pub use middleware::Trace;
