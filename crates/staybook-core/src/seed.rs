//! Sample hotel catalog
//!
//! Populates an empty database with a small set of hotels, rooms and
//! facilities for development and demos.

use tracing::info;

use crate::{HotelRepository, NewHotel, NewRoom, Result};

/// Every facility referenced by the sample rooms
pub const FACILITIES: [&str; 10] = [
    "WiFi",
    "Air Conditioning",
    "TV",
    "Mini Bar",
    "Room Service",
    "Swimming Pool",
    "Gym",
    "Spa",
    "Parking",
    "Pet Friendly",
];

type SeedRoom = (i32, f64, &'static str, &'static [&'static str]);

struct SeedHotel {
    name: &'static str,
    description: &'static str,
    address: &'static str,
    rating: f64,
    rooms: [SeedRoom; 3],
}

const CATALOG: [SeedHotel; 4] = [
    SeedHotel {
        name: "Grand Plaza Hotel",
        description: "Luxurious 5-star hotel in the heart of the city with stunning views and world-class amenities.",
        address: "123 Main Street, Downtown, City 12345",
        rating: 4.8,
        rooms: [
            (25, 150.0, "Cozy single room with city view", &["WiFi", "Air Conditioning", "TV"]),
            (35, 220.0, "Comfortable double room with balcony", &["WiFi", "Air Conditioning", "TV", "Mini Bar"]),
            (50, 350.0, "Spacious suite with living area", &["WiFi", "Air Conditioning", "TV", "Mini Bar", "Room Service"]),
        ],
    },
    SeedHotel {
        name: "Oceanview Resort",
        description: "Beachfront resort offering direct access to pristine beaches and tropical paradise experience.",
        address: "456 Beach Boulevard, Coastal Area, City 67890",
        rating: 4.6,
        rooms: [
            (30, 180.0, "Standard room with ocean view", &["WiFi", "Air Conditioning", "TV", "Swimming Pool"]),
            (45, 280.0, "Deluxe room with private balcony", &["WiFi", "Air Conditioning", "TV", "Mini Bar", "Swimming Pool", "Gym"]),
            (60, 450.0, "Premium suite with jacuzzi", &["WiFi", "Air Conditioning", "TV", "Mini Bar", "Room Service", "Swimming Pool", "Gym", "Spa"]),
        ],
    },
    SeedHotel {
        name: "Mountain Lodge",
        description: "Rustic mountain retreat perfect for nature lovers and adventure seekers.",
        address: "789 Mountain Trail, Highland Valley, City 11111",
        rating: 4.4,
        rooms: [
            (20, 120.0, "Basic cabin room", &["WiFi", "TV", "Parking"]),
            (35, 200.0, "Family room with mountain view", &["WiFi", "Air Conditioning", "TV", "Parking", "Pet Friendly"]),
            (40, 300.0, "Luxury cabin with fireplace", &["WiFi", "Air Conditioning", "TV", "Mini Bar", "Parking", "Pet Friendly"]),
        ],
    },
    SeedHotel {
        name: "Business Center Hotel",
        description: "Modern hotel designed for business travelers with conference facilities and high-speed internet.",
        address: "321 Corporate Avenue, Business District, City 22222",
        rating: 4.5,
        rooms: [
            (28, 160.0, "Standard business room", &["WiFi", "Air Conditioning", "TV", "Gym"]),
            (38, 240.0, "Executive room with work desk", &["WiFi", "Air Conditioning", "TV", "Mini Bar", "Room Service", "Gym"]),
            (55, 400.0, "Presidential suite with meeting room", &["WiFi", "Air Conditioning", "TV", "Mini Bar", "Room Service", "Gym", "Parking"]),
        ],
    },
];

/// The sample hotels as creation requests
pub fn sample_catalog() -> Vec<NewHotel> {
    CATALOG
        .iter()
        .map(|entry| NewHotel {
            name: entry.name.to_string(),
            description: entry.description.to_string(),
            address: entry.address.to_string(),
            rating: entry.rating,
            rooms: entry
                .rooms
                .iter()
                .map(|&(size, price, description, facilities)| NewRoom {
                    size,
                    price,
                    description: description.to_string(),
                    available: true,
                    facilities: facilities.iter().map(|f| f.to_string()).collect(),
                })
                .collect(),
        })
        .collect()
}

/// Insert the sample catalog unless hotels already exist.
///
/// Returns the number of hotels created.
pub async fn seed_catalog(hotels: &dyn HotelRepository) -> Result<usize> {
    let existing = hotels.count_hotels().await?;
    if existing > 0 {
        info!(existing, "Database already seeded, skipping");
        return Ok(0);
    }

    let catalog = sample_catalog();
    let count = catalog.len();
    for new_hotel in catalog {
        let hotel = new_hotel.into_hotel();
        hotels.create_hotel(&hotel).await?;
        info!(name = %hotel.name, rooms = hotel.rooms.len(), "Seeded hotel");
    }

    info!(hotels = count, facilities = FACILITIES.len(), "Database seeding completed");
    Ok(count)
}
