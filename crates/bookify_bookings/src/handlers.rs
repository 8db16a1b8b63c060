// File: crates/bookify_bookings/src/handlers.rs
use crate::service::BookingService;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Json,
};
use bookify_common::models::{Booking, BookingPatch, NewBooking};
use bookify_common::BookifyError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

// Shared state for the booking routes
#[derive(Clone)]
pub struct BookingsState {
    pub service: Arc<BookingService>,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResponse {
    pub deleted_id: Uuid,
}

#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: bool,
}

// Path and body extractors are taken as `Result` so that malformed input gets
// the same JSON error body as every other failure.
fn booking_id(path: Result<Path<Uuid>, PathRejection>) -> Result<Uuid, BookifyError> {
    let Path(id) = path?;
    Ok(id)
}

/// List every booking, oldest first.
#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/bookings",
    responses(
        (status = 200, description = "All bookings ordered by creation time", body = [Booking]),
        (status = 500, description = "Storage failure")
    ),
    tag = "Bookings"
))]
pub async fn list_bookings_handler(
    State(state): State<Arc<BookingsState>>,
) -> Result<Json<Vec<Booking>>, BookifyError> {
    Ok(Json(state.service.list_bookings().await?))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/bookings/{id}",
    params(("id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 200, description = "The booking", body = Booking),
        (status = 400, description = "Malformed id"),
        (status = 404, description = "No such booking")
    ),
    tag = "Bookings"
))]
pub async fn get_booking_handler(
    State(state): State<Arc<BookingsState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Booking>, BookifyError> {
    let id = booking_id(path)?;
    Ok(Json(state.service.get_booking(id).await?))
}

/// Record a booking request. Conflicting requests are stored as `DENIED`.
#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/bookings",
    request_body(content = NewBooking, example = json!({
        "orgId": "6f1c2a8e-9d0b-4f4e-8a57-3f1f0b3a2c11",
        "contact": { "name": "Ada Lovelace", "email": "ada@example.com" },
        "event": {
            "title": "Spring concert",
            "locationId": "1b7e5c1a-1111-4c2b-9a0e-5a8c0f3b7d22",
            "start": "2030-05-01T10:00:00Z",
            "end": "2030-05-01T12:00:00Z",
            "details": "Doors open 9:30"
        },
        "requestNote": "We need the piano"
    })),
    responses(
        (status = 201, description = "Booking recorded as PENDING or DENIED", body = Booking),
        (status = 400, description = "Invalid request")
    ),
    tag = "Bookings"
))]
pub async fn create_booking_handler(
    State(state): State<Arc<BookingsState>>,
    body: Result<Json<NewBooking>, JsonRejection>,
) -> Result<(StatusCode, Json<Booking>), BookifyError> {
    let Json(draft) = body?;
    let booking = state.service.create_booking(draft).await?;
    info!("Booking {} recorded as {}", booking.id, booking.status);
    Ok((StatusCode::CREATED, Json(booking)))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    post,
    path = "/bookings/{id}/approve",
    params(("id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking approved and contact notified", body = Booking),
        (status = 400, description = "Booking is not pending or overlaps an approved booking"),
        (status = 404, description = "No such booking"),
        (status = 502, description = "Approved, but the approval email failed")
    ),
    tag = "Bookings"
))]
pub async fn approve_booking_handler(
    State(state): State<Arc<BookingsState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<Booking>, BookifyError> {
    let id = booking_id(path)?;
    Ok(Json(state.service.approve_booking(id).await?))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    patch,
    path = "/bookings/{id}",
    params(("id" = Uuid, Path, description = "Booking id")),
    request_body = BookingPatch,
    responses(
        (status = 200, description = "Updated booking", body = Booking),
        (status = 400, description = "Invalid patch or booking is not pending"),
        (status = 404, description = "No such booking")
    ),
    tag = "Bookings"
))]
pub async fn edit_booking_handler(
    State(state): State<Arc<BookingsState>>,
    path: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<BookingPatch>, JsonRejection>,
) -> Result<Json<Booking>, BookifyError> {
    let id = booking_id(path)?;
    let Json(patch) = body?;
    Ok(Json(state.service.edit_booking(id, patch).await?))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    delete,
    path = "/bookings/{id}",
    params(("id" = Uuid, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking removed", body = DeletedResponse),
        (status = 404, description = "No such booking")
    ),
    tag = "Bookings"
))]
pub async fn delete_booking_handler(
    State(state): State<Arc<BookingsState>>,
    path: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<DeletedResponse>, BookifyError> {
    let id = booking_id(path)?;
    let deleted_id = state.service.delete_booking(id).await?;
    Ok(Json(DeletedResponse { deleted_id }))
}

#[cfg_attr(feature = "openapi", utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse)),
    tag = "Health"
))]
pub async fn health_handler(State(state): State<Arc<BookingsState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        database: state.service.store_healthy().await,
    })
}
