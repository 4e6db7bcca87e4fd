//! API route definitions
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::auth::{require_admin, require_login};
use crate::handlers::{auth, bookings, hotels, users};
use crate::state::AppState;

/// Create API routes
///
/// Write operations are gated per route: booking needs a logged-in user,
/// creating hotels and users needs an admin. Reads are public.
pub fn api_routes(state: Arc<AppState>) -> Router<Arc<AppState>> {
    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/auth/register", post(auth::register_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/refresh", post(auth::refresh_handler))
        .route("/hotels", get(hotels::list_hotels))
        .route("/hotels/:id", get(hotels::get_hotel))
        .route("/bookings", get(bookings::list_bookings))
        .route("/bookings/:id", get(bookings::get_booking))
        .route("/bookings/user/:user_id", get(bookings::list_user_bookings))
        .route("/users", get(users::list_users))
        .route("/users/:id", get(users::get_user));

    let login_routes = Router::new()
        .route("/bookings", post(bookings::create_booking))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_login));

    let admin_routes = Router::new()
        .route("/hotels", post(hotels::create_hotel))
        .route("/users", post(users::create_user))
        .route_layer(middleware::from_fn_with_state(state, require_admin));

    Router::new()
        .merge(public_routes)
        .merge(login_routes)
        .merge(admin_routes)
}
