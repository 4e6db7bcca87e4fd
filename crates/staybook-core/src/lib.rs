//! Staybook Core - Domain models, workflows and storage
//!
//! This crate defines the core abstractions of the booking backend:
//! - Domain models (users, hotels, rooms, facilities, bookings)
//! - Common error types
//! - Repository traits and their PostgreSQL / in-memory implementations
//! - The booking and hotel catalog workflows
//! - Configuration management

pub mod booking;
pub mod config;
pub mod hotel;
pub mod memory;
pub mod seed;
pub mod store;

pub use booking::BookingService;
pub use config::{AppConfig, AuthConfig, ConfigError, DatabaseConfig, LoggingConfig, ServerConfig};
pub use hotel::HotelService;
pub use memory::MemoryStore;
pub use store::PgStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for Staybook operations
#[derive(Error, Debug)]
pub enum StaybookError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("room not found")]
    RoomNotFound,

    #[error("room is not available")]
    RoomUnavailable,

    #[error("check-out date must be after check-in date")]
    InvalidDateRange,

    #[error("{0} already exists")]
    DuplicateEntry(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StaybookError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StaybookError>;

// ============================================================================
// Users
// ============================================================================

/// A registered account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    /// Argon2 PHC string; never sent to clients
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with a fresh id and timestamps
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        is_admin: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            is_admin,
            created_at: now,
            updated_at: now,
        }
    }
}

// ============================================================================
// Hotel catalog
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Facility {
    pub id: Uuid,
    pub name: String,
}

/// A bookable room. Belongs to exactly one hotel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Room {
    pub id: Uuid,
    pub hotel_id: Uuid,
    /// Floor area in square metres
    pub size: i32,
    /// Nightly price
    pub price: f64,
    pub description: String,
    pub available: bool,
    pub facilities: Vec<Facility>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Hotel {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub address: String,
    pub rating: f64,
    pub rooms: Vec<Room>,
}

impl Hotel {
    /// Find one of this hotel's rooms by id
    pub fn room(&self, room_id: Uuid) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == room_id)
    }
}

/// Input for creating a hotel together with its rooms
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewHotel {
    pub name: String,
    pub description: String,
    pub address: String,
    pub rating: f64,
    #[serde(default)]
    pub rooms: Vec<NewRoom>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewRoom {
    pub size: i32,
    pub price: f64,
    pub description: String,
    #[serde(default = "default_available")]
    pub available: bool,
    /// Facility names; existing facilities are reused by name
    #[serde(default)]
    pub facilities: Vec<String>,
}

fn default_available() -> bool {
    true
}

impl NewHotel {
    /// Assign ids to the hotel, its rooms and their facilities
    pub fn into_hotel(self) -> Hotel {
        let hotel_id = Uuid::new_v4();
        let rooms = self
            .rooms
            .into_iter()
            .map(|room| Room {
                id: Uuid::new_v4(),
                hotel_id,
                size: room.size,
                price: room.price,
                description: room.description,
                available: room.available,
                facilities: room
                    .facilities
                    .into_iter()
                    .map(|name| Facility {
                        id: Uuid::new_v4(),
                        name,
                    })
                    .collect(),
            })
            .collect();

        Hotel {
            id: hotel_id,
            name: self.name,
            description: self.description,
            address: self.address,
            rating: self.rating,
            rooms,
        }
    }
}

// ============================================================================
// Bookings
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub hotel_id: Uuid,
    pub room_id: Uuid,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
    pub total_price: f64,
    pub is_cancelled: bool,
}

/// Input for the booking workflow. The booking user comes from the caller's identity.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NewBooking {
    pub hotel_id: Uuid,
    pub room_id: Uuid,
    pub check_in_date: DateTime<Utc>,
    pub check_out_date: DateTime<Utc>,
}

// ============================================================================
// Repository traits
// ============================================================================

/// User persistence
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user. Fails with `DuplicateEntry` on a username or email clash.
    async fn create_user(&self, user: &User) -> Result<()>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn list_users(&self) -> Result<Vec<User>>;
}

/// Hotel catalog persistence. Hotels are always loaded with rooms and facilities.
#[async_trait]
pub trait HotelRepository: Send + Sync {
    async fn create_hotel(&self, hotel: &Hotel) -> Result<()>;

    async fn get_hotel(&self, id: Uuid) -> Result<Option<Hotel>>;

    async fn list_hotels(&self) -> Result<Vec<Hotel>>;

    async fn count_hotels(&self) -> Result<i64>;
}

/// Booking persistence
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create_booking(&self, booking: &Booking) -> Result<()>;

    async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>>;

    async fn list_bookings(&self) -> Result<Vec<Booking>>;

    async fn list_bookings_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>>;
}
