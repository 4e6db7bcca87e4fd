//! In-memory store
//!
//! Implements every repository over process memory. Used by tests and for
//! running the API without a database.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    Booking, BookingRepository, Facility, Hotel, HotelRepository, Result, StaybookError, User,
    UserRepository,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    hotels: HashMap<Uuid, Hotel>,
    facilities: HashMap<String, Facility>,
    bookings: Vec<Booking>,
}

/// Store keeping all entities behind a single lock
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create_user(&self, user: &User) -> Result<()> {
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|u| u.username == user.username) {
            return Err(StaybookError::DuplicateEntry("username".to_string()));
        }
        if tables.users.iter().any(|u| u.email == user.email) {
            return Err(StaybookError::DuplicateEntry("email".to_string()));
        }

        tables.users.push(user.clone());
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.tables.read().await.users.clone())
    }
}

#[async_trait]
impl HotelRepository for MemoryStore {
    async fn create_hotel(&self, hotel: &Hotel) -> Result<()> {
        let mut tables = self.tables.write().await;

        if tables.hotels.contains_key(&hotel.id) {
            return Err(StaybookError::DuplicateEntry("hotel".to_string()));
        }

        let mut stored = hotel.clone();
        for room in &mut stored.rooms {
            room.hotel_id = stored.id;
            for facility in &mut room.facilities {
                let shared = tables
                    .facilities
                    .entry(facility.name.clone())
                    .or_insert_with(|| facility.clone());
                facility.id = shared.id;
            }
            room.facilities.sort_by(|a, b| a.name.cmp(&b.name));
            room.facilities.dedup_by(|a, b| a.name == b.name);
        }
        stored
            .rooms
            .sort_by(|a, b| a.size.cmp(&b.size).then(a.id.cmp(&b.id)));

        tables.hotels.insert(stored.id, stored);
        Ok(())
    }

    async fn get_hotel(&self, id: Uuid) -> Result<Option<Hotel>> {
        Ok(self.tables.read().await.hotels.get(&id).cloned())
    }

    async fn list_hotels(&self) -> Result<Vec<Hotel>> {
        let tables = self.tables.read().await;
        let mut hotels: Vec<Hotel> = tables.hotels.values().cloned().collect();
        hotels.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(hotels)
    }

    async fn count_hotels(&self) -> Result<i64> {
        Ok(self.tables.read().await.hotels.len() as i64)
    }
}

#[async_trait]
impl BookingRepository for MemoryStore {
    async fn create_booking(&self, booking: &Booking) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.bookings.iter().any(|b| b.id == booking.id) {
            return Err(StaybookError::DuplicateEntry("booking".to_string()));
        }
        tables.bookings.push(booking.clone());
        Ok(())
    }

    async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>> {
        let tables = self.tables.read().await;
        Ok(tables.bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn list_bookings(&self) -> Result<Vec<Booking>> {
        let mut bookings = self.tables.read().await.bookings.clone();
        sort_bookings(&mut bookings);
        Ok(bookings)
    }

    async fn list_bookings_for_user(&self, user_id: Uuid) -> Result<Vec<Booking>> {
        let tables = self.tables.read().await;
        let mut bookings: Vec<Booking> = tables
            .bookings
            .iter()
            .filter(|b| b.user_id == user_id)
            .cloned()
            .collect();
        sort_bookings(&mut bookings);
        Ok(bookings)
    }
}

fn sort_bookings(bookings: &mut [Booking]) {
    bookings.sort_by(|a, b| {
        a.check_in_date
            .cmp(&b.check_in_date)
            .then(a.id.cmp(&b.id))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{NewHotel, NewRoom};

    fn sample_hotel(name: &str) -> Hotel {
        NewHotel {
            name: name.to_string(),
            description: "desc".to_string(),
            address: "addr".to_string(),
            rating: 4.0,
            rooms: vec![
                NewRoom {
                    size: 40,
                    price: 200.0,
                    description: "Suite".to_string(),
                    available: true,
                    facilities: vec!["WiFi".to_string(), "Spa".to_string()],
                },
                NewRoom {
                    size: 20,
                    price: 100.0,
                    description: "Single".to_string(),
                    available: false,
                    facilities: vec!["WiFi".to_string()],
                },
            ],
        }
        .into_hotel()
    }

    #[tokio::test]
    async fn test_unique_username_and_email() {
        let store = MemoryStore::new();
        store
            .create_user(&User::new("bob", "bob@example.com", "h", false))
            .await
            .unwrap();

        let same_name = User::new("bob", "other@example.com", "h", false);
        let err = store.create_user(&same_name).await.unwrap_err();
        assert!(matches!(err, StaybookError::DuplicateEntry(ref f) if f == "username"));

        let same_email = User::new("robert", "bob@example.com", "h", false);
        let err = store.create_user(&same_email).await.unwrap_err();
        assert!(matches!(err, StaybookError::DuplicateEntry(ref f) if f == "email"));

        assert_eq!(store.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_facilities_shared_by_name() {
        let store = MemoryStore::new();
        let first = sample_hotel("Alpha");
        let second = sample_hotel("Beta");
        store.create_hotel(&first).await.unwrap();
        store.create_hotel(&second).await.unwrap();

        let a = store.get_hotel(first.id).await.unwrap().unwrap();
        let b = store.get_hotel(second.id).await.unwrap().unwrap();

        // Rooms ordered by size, facilities by name
        assert_eq!(a.rooms[0].size, 20);
        assert_eq!(a.rooms[1].facilities[0].name, "Spa");
        assert_eq!(a.rooms[0].facilities[0].id, b.rooms[0].facilities[0].id);
        assert_eq!(store.count_hotels().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_repeated_facility_stored_once() {
        let mut hotel = sample_hotel("Gamma");
        let wifi = hotel.rooms[0].facilities[0].clone();
        hotel.rooms[0].facilities.push(wifi);

        let store = MemoryStore::new();
        store.create_hotel(&hotel).await.unwrap();

        let stored = store.get_hotel(hotel.id).await.unwrap().unwrap();
        let names: Vec<&str> = stored.rooms[1]
            .facilities
            .iter()
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(names, vec!["Spa", "WiFi"]);
    }

    #[tokio::test]
    async fn test_list_hotels_sorted_by_name() {
        let store = MemoryStore::new();
        store.create_hotel(&sample_hotel("Zephyr")).await.unwrap();
        store.create_hotel(&sample_hotel("Aurora")).await.unwrap();

        let names: Vec<String> = store
            .list_hotels()
            .await
            .unwrap()
            .into_iter()
            .map(|h| h.name)
            .collect();
        assert_eq!(names, vec!["Aurora", "Zephyr"]);
    }
}
