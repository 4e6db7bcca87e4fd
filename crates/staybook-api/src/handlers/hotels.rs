//! Hotel catalog handlers

use std::sync::Arc;

use axum::extract::State;
use staybook_core::{Hotel, NewHotel};
use uuid::Uuid;

use crate::error::{AppError, AppJson, AppPath};
use crate::response::{ApiResponse, ErrorResponse, HotelListResponse, HotelResponse};
use crate::state::AppState;

/// List all hotels with their rooms and facilities
#[utoipa::path(
    get,
    path = "/hotels",
    tag = "hotels",
    responses(
        (status = 200, description = "Hotels fetched", body = HotelListResponse),
    )
)]
pub async fn list_hotels(
    State(state): State<Arc<AppState>>,
) -> Result<ApiResponse<Vec<Hotel>>, AppError> {
    let hotels = state.hotels.list_hotels().await?;
    Ok(ApiResponse::ok("Hotels fetched successfully", hotels))
}

/// Get one hotel with its rooms and facilities
#[utoipa::path(
    get,
    path = "/hotels/{id}",
    tag = "hotels",
    params(("id" = Uuid, Path, description = "Hotel ID")),
    responses(
        (status = 200, description = "Hotel fetched", body = HotelResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Hotel not found", body = ErrorResponse),
    )
)]
pub async fn get_hotel(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<Uuid>,
) -> Result<ApiResponse<Hotel>, AppError> {
    let hotel = state.hotels.get_hotel(id).await?;
    Ok(ApiResponse::ok("Hotel fetched successfully", hotel))
}

/// Create a hotel with its rooms (admin only)
#[utoipa::path(
    post,
    path = "/hotels",
    tag = "hotels",
    request_body = NewHotel,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Hotel created", body = HotelResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 401, description = "Not logged in", body = ErrorResponse),
        (status = 403, description = "Not an admin", body = ErrorResponse),
    )
)]
pub async fn create_hotel(
    State(state): State<Arc<AppState>>,
    AppJson(request): AppJson<NewHotel>,
) -> Result<ApiResponse<Hotel>, AppError> {
    let hotel = state.hotels.create_hotel(request).await?;
    Ok(ApiResponse::created("Hotel created successfully", hotel))
}
