//! Booking store
//!
//! The persistence boundary for bookings: single-row reads, inserts, updates
//! and deletes keyed by id. No business rules live here.

use crate::error::DbError;
use bookify_common::models::{Booking, BookingStatus, Contact, EventInfo};
use bookify_common::services::BoxFuture;
use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Everything needed to insert a booking; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBookingRecord {
    pub org_id: Uuid,
    pub status: BookingStatus,
    pub contact: Contact,
    pub event: EventInfo,
    pub request_note: Option<String>,
}

/// Fields to overwrite on update. `None` keeps the stored value.
///
/// `request_note: Some(None)` clears the note.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingChanges {
    pub status: Option<BookingStatus>,
    pub contact: Option<Contact>,
    pub event: Option<EventInfo>,
    pub request_note: Option<Option<String>>,
}

impl BookingChanges {
    pub fn status(status: BookingStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }
}

/// Persistence operations for bookings.
pub trait BookingStore: Send + Sync {
    /// Create the `bookings` table if it does not exist yet.
    fn init_schema(&self) -> BoxFuture<'_, (), DbError>;

    /// Cheap round trip used by the health check.
    fn ping(&self) -> BoxFuture<'_, (), DbError>;

    fn get(&self, id: Uuid) -> BoxFuture<'_, Option<Booking>, DbError>;

    /// All bookings, oldest first.
    fn list(&self) -> BoxFuture<'_, Vec<Booking>, DbError>;

    /// Bookings at one location with one status, oldest first.
    fn list_by_location(
        &self,
        location_id: Uuid,
        status: BookingStatus,
    ) -> BoxFuture<'_, Vec<Booking>, DbError>;

    /// Insert a booking. `created_at` and `updated_at` are set to the same instant.
    fn insert(&self, record: NewBookingRecord) -> BoxFuture<'_, Booking, DbError>;

    /// Apply `changes` and refresh `updated_at`. Returns `None` if the id is unknown.
    fn update(&self, id: Uuid, changes: BookingChanges)
        -> BoxFuture<'_, Option<Booking>, DbError>;

    /// Remove a booking. Returns the id if a row was deleted.
    fn delete(&self, id: Uuid) -> BoxFuture<'_, Option<Uuid>, DbError>;
}

/// Timestamps are stored as fixed-width RFC 3339 strings so that text order
/// matches time order.
pub fn to_db_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Drop precision the storage format cannot hold.
pub fn storage_precision(value: DateTime<Utc>) -> DateTime<Utc> {
    value.trunc_subsecs(6)
}

/// An empty note is no note.
pub fn normalize_note(note: Option<String>) -> Option<String> {
    note.filter(|n| !n.is_empty())
}

fn parse_timestamp(column: &str, value: &str) -> Result<DateTime<Utc>, DbError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| DbError::MappingError(format!("{column}: invalid timestamp {value:?}: {e}")))
}

fn parse_uuid(column: &str, value: &str) -> Result<Uuid, DbError> {
    Uuid::parse_str(value)
        .map_err(|e| DbError::MappingError(format!("{column}: invalid uuid {value:?}: {e}")))
}

/// A `bookings` row as stored. Every column is non-null text; a missing
/// request note is stored as `''`.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct BookingRow {
    pub id: String,
    pub created_at: String,
    pub updated_at: String,
    pub org_id: String,
    pub status: String,
    pub contact_name: String,
    pub contact_email: String,
    pub event_title: String,
    pub event_location_id: String,
    pub event_start: String,
    pub event_end: String,
    pub event_details: String,
    pub request_note: String,
}

impl From<&Booking> for BookingRow {
    fn from(booking: &Booking) -> Self {
        Self {
            id: booking.id.to_string(),
            created_at: to_db_timestamp(&booking.created_at),
            updated_at: to_db_timestamp(&booking.updated_at),
            org_id: booking.org_id.to_string(),
            status: booking.status.as_str().to_string(),
            contact_name: booking.contact.name.clone(),
            contact_email: booking.contact.email.clone(),
            event_title: booking.event.title.clone(),
            event_location_id: booking.event.location_id.to_string(),
            event_start: to_db_timestamp(&booking.event.start),
            event_end: to_db_timestamp(&booking.event.end),
            event_details: booking.event.details.clone(),
            request_note: booking.request_note.clone().unwrap_or_default(),
        }
    }
}

impl TryFrom<BookingRow> for Booking {
    type Error = DbError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<BookingStatus>()
            .map_err(|e| DbError::MappingError(format!("status: {e}")))?;

        Ok(Booking {
            id: parse_uuid("id", &row.id)?,
            created_at: parse_timestamp("created_at", &row.created_at)?,
            updated_at: parse_timestamp("updated_at", &row.updated_at)?,
            org_id: parse_uuid("org_id", &row.org_id)?,
            status,
            contact: Contact {
                name: row.contact_name,
                email: row.contact_email,
            },
            event: EventInfo {
                title: row.event_title,
                location_id: parse_uuid("event_location_id", &row.event_location_id)?,
                start: parse_timestamp("event_start", &row.event_start)?,
                end: parse_timestamp("event_end", &row.event_end)?,
                details: row.event_details,
            },
            request_note: normalize_note(Some(row.request_note)),
        })
    }
}
