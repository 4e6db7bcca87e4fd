//! Booking workflow
//!
//! Validates a booking request against the hotel catalog, prices the stay
//! and persists the result.
//!
//! Author: hephaex@gmail.com

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
    Booking, BookingRepository, HotelRepository, NewBooking, Result, StaybookError,
};

/// Number of (possibly fractional) nights between two instants
pub fn nights_between(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> f64 {
    let span = check_out - check_in;
    // Nanosecond precision; spans past ~292 years only fit in milliseconds
    let hours = match span.num_nanoseconds() {
        Some(nanos) => nanos as f64 / 3_600_000_000_000.0,
        None => span.num_milliseconds() as f64 / 3_600_000.0,
    };
    hours / 24.0
}

/// Booking operations over the hotel and booking repositories
#[derive(Clone)]
pub struct BookingService {
    hotels: Arc<dyn HotelRepository>,
    bookings: Arc<dyn BookingRepository>,
}

impl BookingService {
    pub fn new(hotels: Arc<dyn HotelRepository>, bookings: Arc<dyn BookingRepository>) -> Self {
        Self { hotels, bookings }
    }

    /// Create a booking for `user_id`.
    ///
    /// Checks run in order: hotel exists, room belongs to the hotel, room is
    /// available, check-out is after check-in. The total is the room's nightly
    /// price times the fractional number of nights. Overlapping bookings for
    /// the same room are not detected.
    pub async fn create_booking(&self, user_id: Uuid, request: NewBooking) -> Result<Booking> {
        let hotel = self
            .hotels
            .get_hotel(request.hotel_id)
            .await?
            .ok_or_else(|| StaybookError::not_found("hotel", request.hotel_id))?;

        let room = hotel
            .room(request.room_id)
            .ok_or(StaybookError::RoomNotFound)?;

        if !room.available {
            return Err(StaybookError::RoomUnavailable);
        }

        if request.check_out_date <= request.check_in_date {
            return Err(StaybookError::InvalidDateRange);
        }

        let nights = nights_between(request.check_in_date, request.check_out_date);
        let booking = Booking {
            id: Uuid::new_v4(),
            user_id,
            hotel_id: hotel.id,
            room_id: room.id,
            check_in_date: request.check_in_date,
            check_out_date: request.check_out_date,
            total_price: room.price * nights,
            is_cancelled: false,
        };

        self.bookings.create_booking(&booking).await?;

        info!(
            booking_id = %booking.id,
            user_id = %user_id,
            room_id = %room.id,
            nights,
            total_price = booking.total_price,
            "Booking created"
        );
        Ok(booking)
    }

    pub async fn list_bookings(&self) -> Result<Vec<Booking>> {
        self.bookings.list_bookings().await
    }

    pub async fn get_booking(&self, id: Uuid) -> Result<Booking> {
        self.bookings
            .get_booking(id)
            .await?
            .ok_or_else(|| StaybookError::not_found("booking", id))
    }

    pub async fn list_bookings_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>> {
        let bookings = self.bookings.list_bookings_for_user(user_id).await?;
        debug!(user_id = %user_id, count = bookings.len(), "Listed bookings for user");
        Ok(bookings)
    }
}
