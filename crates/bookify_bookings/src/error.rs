// --- File: crates/bookify_bookings/src/error.rs ---
use bookify_common::models::Booking;
use bookify_common::{
    external_service_error, invalid_state, not_found, validation_error, BookifyError,
};
use bookify_db::DbError;
use thiserror::Error;
use uuid::Uuid;

/// Errors returned by the booking lifecycle operations.
///
/// A conflicting create is not an error: it succeeds with status `DENIED`.
#[derive(Error, Debug)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),

    #[error("booking {0} not found")]
    NotFound(Uuid),

    #[error("{0}")]
    InvalidState(String),

    /// The approval was committed but the email could not be delivered.
    #[error("booking {} was approved but the approval email failed: {reason}", booking.id)]
    Notification { booking: Box<Booking>, reason: String },

    #[error("storage failure: {0}")]
    Store(#[from] DbError),
}

impl From<validator::ValidationErrors> for BookingError {
    fn from(errors: validator::ValidationErrors) -> Self {
        BookingError::Validation(errors.to_string())
    }
}

impl From<BookingError> for BookifyError {
    fn from(err: BookingError) -> Self {
        match err {
            BookingError::Validation(message) => validation_error(message),
            BookingError::NotFound(id) => not_found(format!("booking {id}")),
            BookingError::InvalidState(message) => invalid_state(message),
            err @ BookingError::Notification { .. } => external_service_error("email", err),
            BookingError::Store(err) => BookifyError::DatabaseError(err.to_string()),
        }
    }
}
