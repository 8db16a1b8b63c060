// --- File: crates/bookify_bookings/src/routes.rs ---

use crate::handlers::{
    approve_booking_handler, create_booking_handler, delete_booking_handler,
    edit_booking_handler, get_booking_handler, health_handler, list_bookings_handler,
    BookingsState,
};
use crate::service::BookingService;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Creates a router containing the booking routes and the health check.
/// The backend nests it under `/api`.
pub fn routes(service: Arc<BookingService>) -> Router {
    let state = Arc::new(BookingsState { service });

    Router::new()
        .route(
            "/bookings",
            get(list_bookings_handler).post(create_booking_handler),
        )
        .route(
            "/bookings/{id}",
            get(get_booking_handler)
                .patch(edit_booking_handler)
                .delete(delete_booking_handler),
        )
        .route("/bookings/{id}/approve", post(approve_booking_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}
