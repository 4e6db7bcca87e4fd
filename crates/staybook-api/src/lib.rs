//! Staybook API - REST server
//!
//! HTTP endpoints for hotel catalog browsing, room booking and account
//! management.
//!
//! Author: hephaex@gmail.com

pub mod audit;
pub mod auth;
pub mod cors;
pub mod error;
pub mod handlers;
pub mod openapi;
pub mod response;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::{middleware, routing::get, Router};
use staybook_core::config::{AppConfig, LoggingConfig};
use staybook_core::{MemoryStore, StaybookError};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::auth::CredentialHasher;
use crate::error::AppError;
use crate::state::AppState;

/// Filter used when neither `RUST_LOG` nor `LOG_LEVEL` is set
pub const DEFAULT_LOG_FILTER: &str = "staybook_api=debug,staybook_core=debug,tower_http=debug";

/// Secret used by [`create_test_state`]
pub const TEST_JWT_SECRET: &str = "staybook-test-secret";

/// Build the application router over the given state
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors::cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .merge(routes::api_routes(state.clone()))
        .merge(openapi::swagger_ui())
        .fallback(route_not_found)
        .layer(middleware::from_fn(response::track_request_path))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn route_not_found() -> AppError {
    AppError::Core(StaybookError::not_found("route", response::current_path()))
}

/// State over an in-memory store with a fixed secret and a light hasher
pub fn create_test_state() -> Arc<AppState> {
    let mut config = AppConfig::default();
    config.auth.jwt_secret = Some(TEST_JWT_SECRET.to_string());

    let mut state = AppState::with_store(config, Arc::new(MemoryStore::new()));
    if let Ok(hasher) = CredentialHasher::with_params(8 * 1024, 1, 1) {
        state.auth = state.auth.with_hasher(hasher);
    }
    Arc::new(state)
}

/// Create a router for testing (in-memory storage)
pub fn create_router_for_testing() -> Router {
    create_router(create_test_state())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins; otherwise `LOG_LEVEL` (as loaded into `config.level`);
/// otherwise [`DEFAULT_LOG_FILTER`].
pub fn init_tracing(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if std::env::var_os("LOG_LEVEL").is_some() {
            EnvFilter::new(&config.level)
        } else {
            EnvFilter::new(DEFAULT_LOG_FILTER)
        }
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if config.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}
