//! OpenAPI document and Swagger UI
//!
//! Author: hephaex@gmail.com

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::auth::{CreateUserRequest, LoginRequest, RefreshRequest, RegisterRequest, TokenPair};
use crate::handlers::{self, health::HealthResponse};
use crate::response::{
    BookingListResponse, BookingResponse, ErrorResponse, HotelListResponse, HotelResponse,
    TokenResponse, UserListResponse, UserResponse,
};
use staybook_core::{Booking, Facility, Hotel, NewBooking, NewHotel, NewRoom, Room, User};

#[derive(OpenApi)]
#[openapi(
    info(title = "Staybook API", description = "Hotel catalog and room booking service"),
    paths(
        handlers::health::health_check,
        handlers::auth::register_handler,
        handlers::auth::login_handler,
        handlers::auth::refresh_handler,
        handlers::hotels::list_hotels,
        handlers::hotels::get_hotel,
        handlers::hotels::create_hotel,
        handlers::bookings::create_booking,
        handlers::bookings::list_bookings,
        handlers::bookings::get_booking,
        handlers::bookings::list_user_bookings,
        handlers::users::create_user,
        handlers::users::list_users,
        handlers::users::get_user,
    ),
    components(schemas(
        User, Facility, Room, Hotel, NewHotel, NewRoom, Booking, NewBooking,
        RegisterRequest, LoginRequest, RefreshRequest, CreateUserRequest, TokenPair,
        HealthResponse, ErrorResponse,
        UserResponse, UserListResponse, HotelResponse, HotelListResponse,
        BookingResponse, BookingListResponse, TokenResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Liveness"),
        (name = "auth", description = "Registration, login and token refresh"),
        (name = "hotels", description = "Hotel catalog"),
        (name = "bookings", description = "Room bookings"),
        (name = "users", description = "User administration"),
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` scheme referenced by protected operations
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Swagger UI at `/swagger-ui`, serving the document at `/api-docs/openapi.json`
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
