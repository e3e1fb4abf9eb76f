//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel
//! uses them for compile-time query validation and type-safe SQL
//! generation.

diesel::table! {
    /// Reservations moving through the hand-off lifecycle.
    ///
    /// `stage` stores the canonical token; legacy rows may still carry
    /// `pending` or `service_booking`, normalised at read time.
    reservations (id) {
        /// Primary key.
        id -> Int8,
        /// Owning customer account.
        customer_id -> Int8,
        /// Linked event; null on legacy rows.
        event_id -> Nullable<Int8>,
        /// Fulfilling store; null on legacy rows.
        store_id -> Nullable<Int8>,
        /// Legacy free-text event name.
        event_name -> Nullable<Varchar>,
        /// Legacy free-text store name.
        store_name -> Nullable<Varchar>,
        /// Lifecycle stage token.
        stage -> Varchar,
        /// Row creation timestamp.
        created_at -> Timestamptz,
        /// Last mutation timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-(reservation, stage) checklist state.
    ///
    /// Unique on `(reservation_id, stage)`. The photo count is derived
    /// from `reservation_photos`, never stored here.
    reservation_checklists (id) {
        /// Primary key.
        id -> Int8,
        /// Owning reservation.
        reservation_id -> Int8,
        /// Owning hand-off stage token.
        stage -> Varchar,
        /// Ordered `{label, checked}` items.
        items -> Jsonb,
        /// Explicit completion flag.
        completed -> Bool,
        /// When the completion flag was last set.
        completed_at -> Nullable<Timestamptz>,
        /// Last mutation timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Photo attachment metadata; bytes live in the blob store.
    reservation_photos (id) {
        /// Primary key.
        id -> Int8,
        /// Owning reservation.
        reservation_id -> Int8,
        /// Owning hand-off stage token.
        stage -> Varchar,
        /// Sniffed image MIME type.
        content_type -> Varchar,
        /// Payload size in bytes.
        byte_size -> Int8,
        /// Hex-encoded SHA-256 of the payload.
        checksum -> Varchar,
        /// Blob-store key holding the bytes.
        blob_key -> Varchar,
        /// Upload timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// The global verification-code registry.
    ///
    /// The primary key on `code` enforces population-wide uniqueness; a
    /// secondary unique constraint on `(reservation_id, stage)` gives one
    /// immutable slot per pair.
    verification_codes (code) {
        /// The 6-digit code; primary key.
        code -> Varchar,
        /// Owning reservation.
        reservation_id -> Int8,
        /// Stage the code was issued for.
        stage -> Varchar,
        /// Issuance timestamp.
        created_at -> Timestamptz,
    }
}

diesel::joinable!(reservation_checklists -> reservations (reservation_id));
diesel::joinable!(reservation_photos -> reservations (reservation_id));
diesel::joinable!(verification_codes -> reservations (reservation_id));

diesel::allow_tables_to_appear_in_same_query!(
    reservations,
    reservation_checklists,
    reservation_photos,
    verification_codes,
);
