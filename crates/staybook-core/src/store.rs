//! PostgreSQL store
//!
//! Implements the user, hotel and booking repositories using SQLx.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::FromRow;
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    Booking, BookingRepository, Facility, Hotel, HotelRepository, Result, Room, StaybookError,
    User, UserRepository,
};

/// PostgreSQL-backed store for all Staybook entities
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a new store with its own connection pool
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| StaybookError::DatabaseError(format!("PostgreSQL connection failed: {e}")))?;

        info!(max_connections, "Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Create from an existing pool
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply the embedded schema migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StaybookError::DatabaseError(format!("Migration failed: {e}")))?;
        info!("Database migrations applied");
        Ok(())
    }

    async fn load_rooms(&self, hotel_ids: &[Uuid]) -> Result<HashMap<Uuid, Vec<Room>>> {
        let rows: Vec<RoomRow> = sqlx::query_as(
            r#"
            SELECT id, hotel_id, size, price, description, available
            FROM rooms
            WHERE hotel_id = ANY($1)
            ORDER BY size, id
            "#,
        )
        .bind(hotel_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StaybookError::DatabaseError(format!("Failed to load rooms: {e}")))?;

        let room_ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let facility_rows: Vec<RoomFacilityRow> = sqlx::query_as(
            r#"
            SELECT rf.room_id, f.id, f.name
            FROM room_facilities rf
            JOIN facilities f ON f.id = rf.facility_id
            WHERE rf.room_id = ANY($1)
            ORDER BY f.name
            "#,
        )
        .bind(&room_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StaybookError::DatabaseError(format!("Failed to load facilities: {e}")))?;

        let mut facilities: HashMap<Uuid, Vec<Facility>> = HashMap::new();
        for row in facility_rows {
            facilities.entry(row.room_id).or_default().push(Facility {
                id: row.id,
                name: row.name,
            });
        }

        let mut rooms: HashMap<Uuid, Vec<Room>> = HashMap::new();
        for row in rows {
            let room_facilities = facilities.remove(&row.id).unwrap_or_default();
            rooms
                .entry(row.hotel_id)
                .or_default()
                .push(row.into_room(room_facilities));
        }

        Ok(rooms)
    }

    async fn attach_rooms(&self, rows: Vec<HotelRow>) -> Result<Vec<Hotel>> {
        let ids: Vec<Uuid> = rows.iter().map(|h| h.id).collect();
        let mut rooms = self.load_rooms(&ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let hotel_rooms = rooms.remove(&row.id).unwrap_or_default();
                row.into_hotel(hotel_rooms)
            })
            .collect())
    }
}

/// Map an insert failure, surfacing unique violations as duplicates
fn insert_error(what: &str, e: sqlx::Error) -> StaybookError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            let field = match db_err.constraint() {
                Some(c) if c.contains("username") => "username",
                Some(c) if c.contains("email") => "email",
                _ => what,
            };
            return StaybookError::DuplicateEntry(field.to_string());
        }
    }
    StaybookError::DatabaseError(format!("Failed to create {what}: {e}"))
}

// ============================================================================
// Rows
// ============================================================================

#[derive(Debug, FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    is_admin: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: row.password_hash,
            is_admin: row.is_admin,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct HotelRow {
    id: Uuid,
    name: String,
    description: String,
    address: String,
    rating: f64,
}

impl HotelRow {
    fn into_hotel(self, rooms: Vec<Room>) -> Hotel {
        Hotel {
            id: self.id,
            name: self.name,
            description: self.description,
            address: self.address,
            rating: self.rating,
            rooms,
        }
    }
}

#[derive(Debug, FromRow)]
struct RoomRow {
    id: Uuid,
    hotel_id: Uuid,
    size: i32,
    price: f64,
    description: String,
    available: bool,
}

impl RoomRow {
    fn into_room(self, facilities: Vec<Facility>) -> Room {
        Room {
            id: self.id,
            hotel_id: self.hotel_id,
            size: self.size,
            price: self.price,
            description: self.description,
            available: self.available,
            facilities,
        }
    }
}

#[derive(Debug, FromRow)]
struct RoomFacilityRow {
    room_id: Uuid,
    id: Uuid,
    name: String,
}

#[derive(Debug, FromRow)]
struct BookingRow {
    id: Uuid,
    user_id: Uuid,
    hotel_id: Uuid,
    room_id: Uuid,
    check_in_date: DateTime<Utc>,
    check_out_date: DateTime<Utc>,
    total_price: f64,
    is_cancelled: bool,
}

impl From<BookingRow> for Booking {
    fn from(row: BookingRow) -> Self {
        Booking {
            id: row.id,
            user_id: row.user_id,
            hotel_id: row.hotel_id,
            room_id: row.room_id,
            check_in_date: row.check_in_date,
            check_out_date: row.check_out_date,
            total_price: row.total_price,
            is_cancelled: row.is_cancelled,
        }
    }
}

// ============================================================================
// Repositories
// ============================================================================

const USER_COLUMNS: &str = "id, username, email, password_hash, is_admin, created_at, updated_at";
const BOOKING_COLUMNS: &str =
    "id, user_id, hotel_id, room_id, check_in_date, check_out_date, total_price, is_cancelled";

#[async_trait]
impl UserRepository for PgStore {
    async fn create_user(&self, user: &User) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, email, password_hash, is_admin, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.is_admin)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error("user", e))?;

        debug!(user_id = %user.id, "Created user");
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StaybookError::DatabaseError(format!("Failed to get user: {e}")))?;

        Ok(row.map(User::from))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StaybookError::DatabaseError(format!("Failed to get user: {e}")))?;

        Ok(row.map(User::from))
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StaybookError::DatabaseError(format!("Failed to list users: {e}")))?;

        Ok(rows.into_iter().map(User::from).collect())
    }
}

#[async_trait]
impl HotelRepository for PgStore {
    async fn create_hotel(&self, hotel: &Hotel) -> Result<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StaybookError::DatabaseError(format!("Failed to begin transaction: {e}")))?;

        sqlx::query(
            r#"
            INSERT INTO hotels (id, name, description, address, rating)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(hotel.id)
        .bind(&hotel.name)
        .bind(&hotel.description)
        .bind(&hotel.address)
        .bind(hotel.rating)
        .execute(&mut *tx)
        .await
        .map_err(|e| insert_error("hotel", e))?;

        for room in &hotel.rooms {
            sqlx::query(
                r#"
                INSERT INTO rooms (id, hotel_id, size, price, description, available)
                VALUES ($1, $2, $3, $4, $5, $6)
                "#,
            )
            .bind(room.id)
            .bind(hotel.id)
            .bind(room.size)
            .bind(room.price)
            .bind(&room.description)
            .bind(room.available)
            .execute(&mut *tx)
            .await
            .map_err(|e| insert_error("room", e))?;

            for facility in &room.facilities {
                // Facilities are shared across rooms; reuse an existing row by name
                let (facility_id,): (Uuid,) = sqlx::query_as(
                    r#"
                    INSERT INTO facilities (id, name) VALUES ($1, $2)
                    ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                    RETURNING id
                    "#,
                )
                .bind(facility.id)
                .bind(&facility.name)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| insert_error("facility", e))?;

                sqlx::query(
                    r#"
                    INSERT INTO room_facilities (room_id, facility_id) VALUES ($1, $2)
                    ON CONFLICT DO NOTHING
                    "#,
                )
                .bind(room.id)
                .bind(facility_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| insert_error("room facility", e))?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| StaybookError::DatabaseError(format!("Failed to commit hotel: {e}")))?;

        debug!(hotel_id = %hotel.id, rooms = hotel.rooms.len(), "Created hotel");
        Ok(())
    }

    async fn get_hotel(&self, id: Uuid) -> Result<Option<Hotel>> {
        let row: Option<HotelRow> = sqlx::query_as(
            "SELECT id, name, description, address, rating FROM hotels WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StaybookError::DatabaseError(format!("Failed to get hotel: {e}")))?;

        match row {
            Some(row) => Ok(self.attach_rooms(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn list_hotels(&self) -> Result<Vec<Hotel>> {
        let rows: Vec<HotelRow> = sqlx::query_as(
            "SELECT id, name, description, address, rating FROM hotels ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StaybookError::DatabaseError(format!("Failed to list hotels: {e}")))?;

        self.attach_rooms(rows).await
    }

    async fn count_hotels(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM hotels")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StaybookError::DatabaseError(format!("Failed to count hotels: {e}")))?;

        Ok(count)
    }
}

#[async_trait]
impl BookingRepository for PgStore {
    async fn create_booking(&self, booking: &Booking) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, user_id, hotel_id, room_id,
                check_in_date, check_out_date, total_price, is_cancelled
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(booking.id)
        .bind(booking.user_id)
        .bind(booking.hotel_id)
        .bind(booking.room_id)
        .bind(booking.check_in_date)
        .bind(booking.check_out_date)
        .bind(booking.total_price)
        .bind(booking.is_cancelled)
        .execute(&self.pool)
        .await
        .map_err(|e| insert_error("booking", e))?;

        Ok(())
    }

    async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>> {
        let row: Option<BookingRow> =
            sqlx::query_as(&format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StaybookError::DatabaseError(format!("Failed to get booking: {e}")))?;

        Ok(row.map(Booking::from))
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings ORDER BY check_in_date, id"
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StaybookError::DatabaseError(format!("Failed to list bookings: {e}")))?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }

    async fn list_bookings_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>> {
        let rows: Vec<BookingRow> = sqlx::query_as(&format!(
            "SELECT {BOOKING_COLUMNS} FROM bookings WHERE user_id = $1 ORDER BY check_in_date, id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StaybookError::DatabaseError(format!("Failed to list bookings: {e}")))?;

        Ok(rows.into_iter().map(Booking::from).collect())
    }
}
