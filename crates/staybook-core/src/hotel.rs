//! Hotel catalog operations

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::{Hotel, HotelRepository, NewHotel, Result, StaybookError};

#[derive(Clone)]
pub struct HotelService {
    hotels: Arc<dyn HotelRepository>,
}

impl HotelService {
    pub fn new(hotels: Arc<dyn HotelRepository>) -> Self {
        Self { hotels }
    }

    /// Create a hotel with its rooms and return it as stored
    pub async fn create_hotel(&self, new_hotel: NewHotel) -> Result<Hotel> {
        validate_new_hotel(&new_hotel)?;

        let hotel = new_hotel.into_hotel();
        self.hotels.create_hotel(&hotel).await?;
        info!(hotel_id = %hotel.id, name = %hotel.name, rooms = hotel.rooms.len(), "Hotel created");

        self.get_hotel(hotel.id).await
    }

    pub async fn list_hotels(&self) -> Result<Vec<Hotel>> {
        self.hotels.list_hotels().await
    }

    pub async fn get_hotel(&self, id: Uuid) -> Result<Hotel> {
        self.hotels
            .get_hotel(id)
            .await?
            .ok_or_else(|| StaybookError::not_found("hotel", id))
    }
}

fn validate_new_hotel(hotel: &NewHotel) -> Result<()> {
    if hotel.name.trim().is_empty() {
        return Err(StaybookError::ValidationError(
            "hotel name must not be empty".to_string(),
        ));
    }
    if !(0.0..=5.0).contains(&hotel.rating) {
        return Err(StaybookError::ValidationError(format!(
            "rating must be between 0 and 5, got {}",
            hotel.rating
        )));
    }
    for room in &hotel.rooms {
        if room.size <= 0 {
            return Err(StaybookError::ValidationError(
                "room size must be positive".to_string(),
            ));
        }
        if !room.price.is_finite() || room.price < 0.0 {
            return Err(StaybookError::ValidationError(
                "room price must be a non-negative number".to_string(),
            ));
        }
    }
    Ok(())
}
