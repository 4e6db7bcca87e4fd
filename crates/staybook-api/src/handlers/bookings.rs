//! Booking handlers

use std::sync::Arc;

use axum::{extract::State, Extension};
use staybook_core::{Booking, NewBooking};
use uuid::Uuid;

use crate::audit::{audit_log, AuditEvent};
use crate::auth::AuthenticatedUser;
use crate::error::{AppError, AppJson, AppPath};
use crate::response::{ApiResponse, BookingListResponse, BookingResponse, ErrorResponse};
use crate::state::AppState;

/// Book a room for the logged-in user
///
/// The booking is made for the user identified by the access token. The
/// total price is the nightly price times the (fractional) number of nights.
#[utoipa::path(
    post,
    path = "/bookings",
    tag = "bookings",
    request_body = NewBooking,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Booking created", body = BookingResponse),
        (status = 400, description = "Invalid input or check-out not after check-in", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 404, description = "Hotel or room not found", body = ErrorResponse),
        (status = 409, description = "Room is not available", body = ErrorResponse),
    )
)]
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthenticatedUser>,
    AppJson(request): AppJson<NewBooking>,
) -> Result<ApiResponse<Booking>, AppError> {
    let booking = state.bookings.create_booking(user.user_id, request).await?;

    audit_log(&AuditEvent::BookingCreated {
        booking_id: booking.id,
        user_id: booking.user_id,
        room_id: booking.room_id,
        total_price: booking.total_price,
    });

    Ok(ApiResponse::created("Booking created successfully", booking))
}

/// List all bookings
#[utoipa::path(
    get,
    path = "/bookings",
    tag = "bookings",
    responses((status = 200, description = "Bookings fetched", body = BookingListResponse))
)]
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<Vec<Booking>>, AppError> {
    let bookings = state.bookings.list_bookings().await?;
    Ok(ApiResponse::ok("Bookings fetched successfully", bookings))
}

#[utoipa::path(
    get,
    path = "/bookings/{id}",
    tag = "bookings",
    params(("id" = Uuid, Path, description = "Booking ID")),
    responses(
        (status = 200, description = "Booking fetched", body = BookingResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Booking not found", body = ErrorResponse),
    )
)]
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<ApiResponse<Booking>, AppError> {
    let booking = state.bookings.get_booking(id).await?;
    Ok(ApiResponse::ok("Booking fetched successfully", booking))
}

#[utoipa::path(
    get,
    path = "/bookings/user/{user_id}",
    tag = "bookings",
    params(("user_id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "Bookings fetched", body = BookingListResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
    )
)]
pub async fn list_user_bookings(
    State(state): State<Arc<AppState>>,
    AppPath(user_id): AppPath<Uuid>,
) -> Result<ApiResponse<Vec<Booking>>, AppError> {
    let bookings = state.bookings.list_bookings_for_user(user_id).await?;
    Ok(ApiResponse::ok("Bookings fetched successfully", bookings))
}
