// File: crates/bookify_bookings/src/doc.rs
#![cfg(feature = "openapi")]

use crate::handlers::{DeletedResponse, HealthResponse};
use bookify_common::models::{
    Booking, BookingPatch, BookingStatus, Contact, ContactPatch, EventInfo, EventPatch, NewBooking,
};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::handlers::list_bookings_handler,
        crate::handlers::get_booking_handler,
        crate::handlers::create_booking_handler,
        crate::handlers::approve_booking_handler,
        crate::handlers::edit_booking_handler,
        crate::handlers::delete_booking_handler,
        crate::handlers::health_handler,
    ),
    components(
        schemas(
            Booking,
            BookingStatus,
            Contact,
            EventInfo,
            NewBooking,
            BookingPatch,
            ContactPatch,
            EventPatch,
            DeletedResponse,
            HealthResponse
        )
    ),
    tags(
        (name = "Bookings", description = "Booking requests, approval and conflict detection"),
        (name = "Health", description = "Liveness and storage status")
    ),
    servers(
        (url = "/api", description = "Bookify API server")
    )
)]
pub struct BookingsApiDoc;
