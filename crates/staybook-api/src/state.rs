//! Application state management
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;
use std::time::Instant;

use staybook_core::config::AppConfig;
use staybook_core::{BookingRepository, BookingService, HotelRepository, HotelService, UserRepository};

use crate::auth::{AuthService, TokenIssuer};

/// Application state shared across handlers
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Server start time
    pub start_time: Instant,
    pub auth: AuthService,
    pub hotels: HotelService,
    pub bookings: BookingService,
}

impl AppState {
    /// Wire the services over the given repositories
    pub fn new(
        config: AppConfig,
        users: Arc<dyn UserRepository>,
        hotels: Arc<dyn HotelRepository>,
        bookings: Arc<dyn BookingRepository>,
    ) -> Self {
        let tokens = TokenIssuer::new(&config.auth);

        Self {
            auth: AuthService::new(users, tokens),
            hotels: HotelService::new(hotels.clone()),
            bookings: BookingService::new(hotels, bookings),
            config,
            start_time: Instant::now(),
        }
    }

    /// Build state over a single store implementing every repository
    pub fn with_store<S>(config: AppConfig, store: Arc<S>) -> Self
    where
        S: UserRepository + HotelRepository + BookingRepository + 'static,
    {
        Self::new(config, store.clone(), store.clone(), store)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
