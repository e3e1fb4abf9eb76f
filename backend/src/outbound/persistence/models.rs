//! Row structs bridging Diesel and the domain aggregates.
//!
//! Conversions into domain types live beside the repositories; these
//! structs only mirror the table shapes.

use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::{reservation_checklists, reservation_photos, reservations, verification_codes};

/// A `reservations` row as loaded from the store.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reservations)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReservationRow {
    pub id: i64,
    pub customer_id: i64,
    pub event_id: Option<i64>,
    pub store_id: Option<i64>,
    pub event_name: Option<String>,
    pub store_name: Option<String>,
    pub stage: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A `reservation_checklists` row as loaded from the store.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reservation_checklists)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ChecklistRow {
    pub id: i64,
    pub reservation_id: i64,
    pub stage: String,
    pub items: serde_json::Value,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub updated_at: DateTime<Utc>,
}

/// Insert/upsert payload for `reservation_checklists`.
#[derive(Debug, Insertable)]
#[diesel(table_name = reservation_checklists)]
pub struct NewChecklistRow<'a> {
    pub reservation_id: i64,
    pub stage: &'a str,
    pub items: serde_json::Value,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

/// A `reservation_photos` row as loaded from the store.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reservation_photos)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct PhotoRow {
    pub id: i64,
    pub reservation_id: i64,
    pub stage: String,
    pub content_type: String,
    pub byte_size: i64,
    pub checksum: String,
    pub blob_key: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for `reservation_photos`.
#[derive(Debug, Insertable)]
#[diesel(table_name = reservation_photos)]
pub struct NewPhotoRow<'a> {
    pub reservation_id: i64,
    pub stage: &'a str,
    pub content_type: &'a str,
    pub byte_size: i64,
    pub checksum: &'a str,
    pub blob_key: &'a str,
}

/// A `verification_codes` row as loaded from the store.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = verification_codes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CodeRow {
    pub code: String,
    pub reservation_id: i64,
    pub stage: String,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for `verification_codes`.
#[derive(Debug, Insertable)]
#[diesel(table_name = verification_codes)]
pub struct NewCodeRow<'a> {
    pub code: &'a str,
    pub reservation_id: i64,
    pub stage: &'a str,
}
