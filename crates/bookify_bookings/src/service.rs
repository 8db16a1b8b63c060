// --- File: crates/bookify_bookings/src/service.rs ---
//! Booking lifecycle service.
//!
//! Owns the state machine:
//!
//! ```text
//! PENDING --approve--> APPROVED
//! PENDING --(conflict at create/edit)--> DENIED
//! any --delete--> (removed)
//! ```
//!
//! Every check-then-write sequence that can admit or approve a booking runs
//! under one admission lock, so two requests in this process can never both
//! claim the same slot. The lock is not held while an email is sent.

use crate::error::BookingError;
use crate::logic::{
    admission_status, find_conflict, merge_patch, normalize_draft, validate_draft, validate_parts,
};
use bookify_common::models::{Booking, BookingPatch, BookingStatus, NewBooking};
use bookify_common::services::EmailNotifier;
use bookify_db::{BookingChanges, BookingStore, NewBookingRecord};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

pub struct BookingService {
    store: Arc<dyn BookingStore>,
    notifier: Arc<dyn EmailNotifier>,
    admission: Mutex<()>,
}

impl BookingService {
    pub fn new(store: Arc<dyn BookingStore>, notifier: Arc<dyn EmailNotifier>) -> Self {
        Self {
            store,
            notifier,
            admission: Mutex::new(()),
        }
    }

    /// All bookings, oldest first.
    pub async fn list_bookings(&self) -> Result<Vec<Booking>, BookingError> {
        debug!("Listing bookings");
        Ok(self.store.list().await?)
    }

    pub async fn get_booking(&self, id: Uuid) -> Result<Booking, BookingError> {
        debug!("Fetching booking {}", id);
        self.store
            .get(id)
            .await?
            .ok_or(BookingError::NotFound(id))
    }

    /// Validate and record a booking request.
    ///
    /// A request that overlaps an approved booking at the same location is
    /// still stored, with status `DENIED`.
    pub async fn create_booking(&self, draft: NewBooking) -> Result<Booking, BookingError> {
        let draft = normalize_draft(draft);
        validate_draft(&draft)?;

        let _admission = self.admission.lock().await;

        let approved = self
            .store
            .list_by_location(draft.event.location_id, BookingStatus::Approved)
            .await?;
        let conflict = find_conflict(&draft.event, &approved, None);
        if let Some(existing) = conflict {
            warn!(
                "Booking request for location {} overlaps approved booking {}; recording as denied",
                draft.event.location_id, existing.id
            );
        }
        let status = admission_status(conflict);

        let booking = self
            .store
            .insert(NewBookingRecord {
                org_id: draft.org_id,
                status,
                contact: draft.contact,
                event: draft.event,
                request_note: draft.request_note,
            })
            .await?;

        info!("Booking {} created with status {}", booking.id, booking.status);
        Ok(booking)
    }

    /// Move a pending booking to `APPROVED` and email the contact.
    ///
    /// The approval is committed before the email is sent. If sending fails
    /// the booking stays approved and the error carries it.
    pub async fn approve_booking(&self, id: Uuid) -> Result<Booking, BookingError> {
        let approved = {
            let _admission = self.admission.lock().await;

            let booking = self.get_booking(id).await?;
            if booking.status != BookingStatus::Pending {
                return Err(BookingError::InvalidState(
                    "cannot approve: not pending".to_string(),
                ));
            }

            let approved_here = self
                .store
                .list_by_location(booking.event.location_id, BookingStatus::Approved)
                .await?;
            if let Some(existing) = find_conflict(&booking.event, &approved_here, Some(id)) {
                warn!(
                    "Refusing to approve booking {}: overlaps approved booking {}",
                    id, existing.id
                );
                return Err(BookingError::InvalidState(
                    "cannot approve: overlaps an approved booking".to_string(),
                ));
            }

            self.store
                .update(id, BookingChanges::status(BookingStatus::Approved))
                .await?
                .ok_or(BookingError::NotFound(id))?
        };
        info!("Booking {} approved", id);

        if let Err(err) = self.notifier.send_approval(&approved).await {
            warn!("Approval email for booking {} failed: {}", id, err);
            return Err(BookingError::Notification {
                booking: Box::new(approved),
                reason: err.to_string(),
            });
        }

        Ok(approved)
    }

    /// Apply an edit to a pending booking.
    ///
    /// Moving it onto an approved booking's slot denies it, as at creation.
    pub async fn edit_booking(
        &self,
        id: Uuid,
        patch: BookingPatch,
    ) -> Result<Booking, BookingError> {
        let _admission = self.admission.lock().await;

        let booking = self.get_booking(id).await?;
        if booking.status != BookingStatus::Pending {
            return Err(BookingError::InvalidState(
                "cannot edit: not pending".to_string(),
            ));
        }

        let merged = merge_patch(&booking, patch);
        validate_parts(&merged.contact, &merged.event)?;

        let mut status = None;
        if merged.schedule_changed {
            let approved = self
                .store
                .list_by_location(merged.event.location_id, BookingStatus::Approved)
                .await?;
            if let Some(existing) = find_conflict(&merged.event, &approved, Some(id)) {
                warn!(
                    "Edited booking {} overlaps approved booking {}; denying",
                    id, existing.id
                );
                status = Some(BookingStatus::Denied);
            }
        }

        let updated = self
            .store
            .update(
                id,
                BookingChanges {
                    status,
                    contact: Some(merged.contact),
                    event: Some(merged.event),
                    request_note: Some(merged.request_note),
                },
            )
            .await?
            .ok_or(BookingError::NotFound(id))?;

        info!("Booking {} edited (status {})", id, updated.status);
        Ok(updated)
    }

    /// Remove a booking regardless of its status.
    pub async fn delete_booking(&self, id: Uuid) -> Result<Uuid, BookingError> {
        let deleted = self
            .store
            .delete(id)
            .await?
            .ok_or(BookingError::NotFound(id))?;

        info!("Booking {} deleted", deleted);
        Ok(deleted)
    }

    /// Whether the store answers.
    pub async fn store_healthy(&self) -> bool {
        self.store.ping().await.is_ok()
    }
}
