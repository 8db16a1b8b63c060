//! In-memory booking store
//!
//! Used when no database is configured and as a fast store in tests.

use crate::error::DbError;
use crate::repositories::booking::{
    normalize_note, storage_precision, BookingChanges, BookingStore, NewBookingRecord,
};
use bookify_common::models::{Booking, BookingStatus};
use bookify_common::services::BoxFuture;
use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Keeps bookings in insertion order, which is also `created_at` order.
#[derive(Debug, Default)]
pub struct InMemoryBookingStore {
    bookings: RwLock<Vec<Booking>>,
}

impl InMemoryBookingStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookingStore for InMemoryBookingStore {
    fn init_schema(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async { Ok(()) })
    }

    fn ping(&self) -> BoxFuture<'_, (), DbError> {
        Box::pin(async { Ok(()) })
    }

    fn get(&self, id: Uuid) -> BoxFuture<'_, Option<Booking>, DbError> {
        Box::pin(async move {
            let bookings = self.bookings.read().await;
            Ok(bookings.iter().find(|b| b.id == id).cloned())
        })
    }

    fn list(&self) -> BoxFuture<'_, Vec<Booking>, DbError> {
        Box::pin(async move { Ok(self.bookings.read().await.clone()) })
    }

    fn list_by_location(
        &self,
        location_id: Uuid,
        status: BookingStatus,
    ) -> BoxFuture<'_, Vec<Booking>, DbError> {
        Box::pin(async move {
            let bookings = self.bookings.read().await;
            Ok(bookings
                .iter()
                .filter(|b| b.event.location_id == location_id && b.status == status)
                .cloned()
                .collect())
        })
    }

    fn insert(&self, record: NewBookingRecord) -> BoxFuture<'_, Booking, DbError> {
        Box::pin(async move {
            let now = storage_precision(Utc::now());
            let mut event = record.event;
            event.start = storage_precision(event.start);
            event.end = storage_precision(event.end);

            let booking = Booking {
                id: Uuid::new_v4(),
                created_at: now,
                updated_at: now,
                org_id: record.org_id,
                status: record.status,
                contact: record.contact,
                event,
                request_note: normalize_note(record.request_note),
            };
            debug!("Inserting booking {} in memory", booking.id);

            self.bookings.write().await.push(booking.clone());
            Ok(booking)
        })
    }

    fn update(
        &self,
        id: Uuid,
        changes: BookingChanges,
    ) -> BoxFuture<'_, Option<Booking>, DbError> {
        Box::pin(async move {
            let mut bookings = self.bookings.write().await;
            let Some(booking) = bookings.iter_mut().find(|b| b.id == id) else {
                return Ok(None);
            };

            if let Some(status) = changes.status {
                booking.status = status;
            }
            if let Some(contact) = changes.contact {
                booking.contact = contact;
            }
            if let Some(mut event) = changes.event {
                event.start = storage_precision(event.start);
                event.end = storage_precision(event.end);
                booking.event = event;
            }
            if let Some(note) = changes.request_note {
                booking.request_note = normalize_note(note);
            }
            booking.updated_at = storage_precision(Utc::now());

            Ok(Some(booking.clone()))
        })
    }

    fn delete(&self, id: Uuid) -> BoxFuture<'_, Option<Uuid>, DbError> {
        Box::pin(async move {
            let mut bookings = self.bookings.write().await;
            let before = bookings.len();
            bookings.retain(|b| b.id != id);
            Ok((bookings.len() < before).then_some(id))
        })
    }
}
