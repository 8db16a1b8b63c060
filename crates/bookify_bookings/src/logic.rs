// --- File: crates/bookify_bookings/src/logic.rs ---
//! Pure booking rules: interval overlap, conflict search, request validation
//! and patch merging. Nothing here touches the store.

use crate::error::BookingError;
use bookify_common::models::{
    Booking, BookingPatch, BookingStatus, Contact, EventInfo, NewBooking,
};
use bookify_db::{normalize_note, storage_precision};
use chrono::{DateTime, Utc};
use validator::Validate;

/// Whether `[a_start, a_end)` overlaps `[b_start, b_end)`.
///
/// `a` is the candidate, `b` the existing booking. Intervals that merely touch
/// do not overlap.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    (b_start <= a_start && a_start < b_end)
        || (b_start < a_end && a_end <= b_end)
        || (a_start <= b_start && a_end >= b_end)
}

/// Whether `candidate` competes with `existing` for the same location and time.
pub fn conflicts_with(candidate: &EventInfo, existing: &EventInfo) -> bool {
    candidate.location_id == existing.location_id
        && overlaps(candidate.start, candidate.end, existing.start, existing.end)
}

/// First approved booking that conflicts with `candidate`.
///
/// `own_id` skips the booking being edited or approved.
pub fn find_conflict<'a>(
    candidate: &EventInfo,
    bookings: &'a [Booking],
    own_id: Option<uuid::Uuid>,
) -> Option<&'a Booking> {
    bookings.iter().find(|existing| {
        existing.status == BookingStatus::Approved
            && Some(existing.id) != own_id
            && conflicts_with(candidate, &existing.event)
    })
}

/// Status a request is admitted with.
pub fn admission_status(conflict: Option<&Booking>) -> BookingStatus {
    match conflict {
        Some(_) => BookingStatus::Denied,
        None => BookingStatus::Pending,
    }
}

fn validate_window(event: &EventInfo) -> Result<(), BookingError> {
    if event.start < event.end {
        Ok(())
    } else {
        Err(BookingError::Validation(format!(
            "event start ({}) must be before event end ({})",
            event.start.to_rfc3339(),
            event.end.to_rfc3339()
        )))
    }
}

/// Bring a create request to the precision and shape the stores keep.
///
/// Times are cut to whole microseconds and an empty note becomes no note, so
/// the conflict check sees exactly what gets stored.
pub fn normalize_draft(mut draft: NewBooking) -> NewBooking {
    normalize_event(&mut draft.event);
    draft.request_note = normalize_note(draft.request_note);
    draft
}

fn normalize_event(event: &mut EventInfo) {
    event.start = storage_precision(event.start);
    event.end = storage_precision(event.end);
}

/// Shape checks for a create request.
pub fn validate_draft(draft: &NewBooking) -> Result<(), BookingError> {
    draft.validate()?;
    validate_window(&draft.event)
}

/// Shape checks for a contact and event pair, as produced by an edit.
pub fn validate_parts(contact: &Contact, event: &EventInfo) -> Result<(), BookingError> {
    contact.validate()?;
    event.validate()?;
    validate_window(event)
}

/// Result of applying a patch to a booking.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedBooking {
    pub contact: Contact,
    pub event: EventInfo,
    pub request_note: Option<String>,
    /// Location or interval differ from the stored booking.
    pub schedule_changed: bool,
}

/// Overlay the present fields of `patch` on `booking`.
///
/// The merged event is normalised like a new draft.
pub fn merge_patch(booking: &Booking, patch: BookingPatch) -> MergedBooking {
    let mut contact = booking.contact.clone();
    if let Some(changes) = patch.contact {
        if let Some(name) = changes.name {
            contact.name = name;
        }
        if let Some(email) = changes.email {
            contact.email = email;
        }
    }

    let mut event = booking.event.clone();
    if let Some(changes) = patch.event {
        if let Some(title) = changes.title {
            event.title = title;
        }
        if let Some(location_id) = changes.location_id {
            event.location_id = location_id;
        }
        if let Some(start) = changes.start {
            event.start = start;
        }
        if let Some(end) = changes.end {
            event.end = end;
        }
        if let Some(details) = changes.details {
            event.details = details;
        }
    }
    normalize_event(&mut event);

    let schedule_changed = event.location_id != booking.event.location_id
        || event.start != booking.event.start
        || event.end != booking.event.end;

    MergedBooking {
        contact,
        event,
        request_note: match patch.request_note {
            Some(note) => normalize_note(note),
            None => booking.request_note.clone(),
        },
        schedule_changed,
    }
}
