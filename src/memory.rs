//! In-memory storage adapter
//!
//! One `BTreeMap` per entity type keyed by a monotonically increasing
//! integer id, all behind a single mutex. Ids surface as strings ("1",
//! "2", ...) to satisfy the opaque-id contract of the storage port; an id
//! minted by the document adapter simply fails to parse and reads as a
//! miss. All state is lost on process restart, which is the point: this
//! adapter exists for development, demos and tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;

use crate::model::{
    Booking, BookingStatus, Hotel, HotelAmenity, InsertBooking, InsertHotel, InsertHotelAmenity,
    InsertRoom, InsertRoomAmenity, InsertUser, Room, RoomAmenity, Session, UpdateHotel,
    UpdateRoom, User,
};
use crate::storage::{Storage, StorageError};

#[derive(Default)]
struct Inner {
    users: BTreeMap<i64, User>,
    hotels: BTreeMap<i64, Hotel>,
    hotel_amenities: BTreeMap<i64, HotelAmenity>,
    rooms: BTreeMap<i64, Room>,
    room_amenities: BTreeMap<i64, RoomAmenity>,
    bookings: BTreeMap<i64, Booking>,
    sessions: HashMap<String, Session>,

    // ID counters, one per entity type
    user_id: i64,
    hotel_id: i64,
    hotel_amenity_id: i64,
    room_id: i64,
    room_amenity_id: i64,
    booking_id: i64,
}

/// Pre-increments the counter so the first assigned id is 1
fn next_id(counter: &mut i64) -> i64 {
    *counter += 1;
    *counter
}

/// Parses an opaque id back into this adapter's integer key space
///
/// Ids from another adapter are not integers and read as misses.
fn parse_id(id: &str) -> Option<i64> {
    id.parse().ok()
}

pub struct MemoryStorage {
    inner: Mutex<Inner>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage {
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("storage mutex poisoned")
    }
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_user(&self, id: &str) -> Result<Option<User>, StorageError> {
        let inner = self.lock();
        Ok(parse_id(id).and_then(|key| inner.users.get(&key).cloned()))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let inner = self.lock();
        Ok(inner
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn create_user(&self, user: InsertUser) -> Result<User, StorageError> {
        let mut inner = self.lock();
        let key = next_id(&mut inner.user_id);
        let user = user.into_user(key.to_string());
        inner.users.insert(key, user.clone());
        Ok(user)
    }

    async fn get_all_hotels(&self) -> Result<Vec<Hotel>, StorageError> {
        let inner = self.lock();
        Ok(inner.hotels.values().cloned().collect())
    }

    async fn get_hotel(&self, id: &str) -> Result<Option<Hotel>, StorageError> {
        let inner = self.lock();
        Ok(parse_id(id).and_then(|key| inner.hotels.get(&key).cloned()))
    }

    async fn create_hotel(&self, hotel: InsertHotel) -> Result<Hotel, StorageError> {
        let mut inner = self.lock();
        let key = next_id(&mut inner.hotel_id);
        let hotel = hotel.into_hotel(key.to_string());
        inner.hotels.insert(key, hotel.clone());
        Ok(hotel)
    }

    async fn update_hotel(
        &self,
        id: &str,
        update: UpdateHotel,
    ) -> Result<Option<Hotel>, StorageError> {
        let mut inner = self.lock();
        let Some(key) = parse_id(id) else {
            return Ok(None);
        };
        match inner.hotels.get_mut(&key) {
            Some(hotel) => {
                update.apply(hotel);
                Ok(Some(hotel.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_hotel(&self, id: &str) -> Result<bool, StorageError> {
        let mut inner = self.lock();
        match parse_id(id) {
            Some(key) => Ok(inner.hotels.remove(&key).is_some()),
            None => Ok(false),
        }
    }

    async fn get_hotel_amenities(
        &self,
        hotel_id: &str,
    ) -> Result<Vec<HotelAmenity>, StorageError> {
        let inner = self.lock();
        Ok(inner
            .hotel_amenities
            .values()
            .filter(|amenity| amenity.hotel_id == hotel_id)
            .cloned()
            .collect())
    }

    async fn create_hotel_amenity(
        &self,
        amenity: InsertHotelAmenity,
    ) -> Result<HotelAmenity, StorageError> {
        let mut inner = self.lock();
        let key = next_id(&mut inner.hotel_amenity_id);
        let amenity = amenity.into_amenity(key.to_string());
        inner.hotel_amenities.insert(key, amenity.clone());
        Ok(amenity)
    }

    async fn get_rooms_for_hotel(&self, hotel_id: &str) -> Result<Vec<Room>, StorageError> {
        let inner = self.lock();
        Ok(inner
            .rooms
            .values()
            .filter(|room| room.hotel_id == hotel_id)
            .cloned()
            .collect())
    }

    async fn get_room(&self, id: &str) -> Result<Option<Room>, StorageError> {
        let inner = self.lock();
        Ok(parse_id(id).and_then(|key| inner.rooms.get(&key).cloned()))
    }

    async fn create_room(&self, room: InsertRoom) -> Result<Room, StorageError> {
        let mut inner = self.lock();
        let key = next_id(&mut inner.room_id);
        let room = room.into_room(key.to_string());
        inner.rooms.insert(key, room.clone());
        Ok(room)
    }

    async fn update_room(
        &self,
        id: &str,
        update: UpdateRoom,
    ) -> Result<Option<Room>, StorageError> {
        let mut inner = self.lock();
        let Some(key) = parse_id(id) else {
            return Ok(None);
        };
        match inner.rooms.get_mut(&key) {
            Some(room) => {
                update.apply(room);
                Ok(Some(room.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_room(&self, id: &str) -> Result<bool, StorageError> {
        let mut inner = self.lock();
        match parse_id(id) {
            Some(key) => Ok(inner.rooms.remove(&key).is_some()),
            None => Ok(false),
        }
    }

    async fn get_room_amenities(&self, room_id: &str) -> Result<Vec<RoomAmenity>, StorageError> {
        let inner = self.lock();
        Ok(inner
            .room_amenities
            .values()
            .filter(|amenity| amenity.room_id == room_id)
            .cloned()
            .collect())
    }

    async fn create_room_amenity(
        &self,
        amenity: InsertRoomAmenity,
    ) -> Result<RoomAmenity, StorageError> {
        let mut inner = self.lock();
        let key = next_id(&mut inner.room_amenity_id);
        let amenity = amenity.into_amenity(key.to_string());
        inner.room_amenities.insert(key, amenity.clone());
        Ok(amenity)
    }

    async fn get_booking(&self, id: &str) -> Result<Option<Booking>, StorageError> {
        let inner = self.lock();
        Ok(parse_id(id).and_then(|key| inner.bookings.get(&key).cloned()))
    }

    async fn get_user_bookings(&self, user_id: &str) -> Result<Vec<Booking>, StorageError> {
        let inner = self.lock();
        Ok(inner
            .bookings
            .values()
            .filter(|booking| booking.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get_all_bookings(&self) -> Result<Vec<Booking>, StorageError> {
        let inner = self.lock();
        Ok(inner.bookings.values().cloned().collect())
    }

    async fn create_booking(&self, booking: InsertBooking) -> Result<Booking, StorageError> {
        let mut inner = self.lock();
        let key = next_id(&mut inner.booking_id);
        let booking = booking.into_booking(key.to_string(), Utc::now());
        inner.bookings.insert(key, booking.clone());
        Ok(booking)
    }

    async fn update_booking_status(
        &self,
        id: &str,
        status: BookingStatus,
    ) -> Result<Option<Booking>, StorageError> {
        let mut inner = self.lock();
        let Some(key) = parse_id(id) else {
            return Ok(None);
        };
        match inner.bookings.get_mut(&key) {
            Some(booking) => {
                booking.status = status;
                Ok(Some(booking.clone()))
            }
            None => Ok(None),
        }
    }

    async fn create_session(&self, session: Session) -> Result<(), StorageError> {
        let mut inner = self.lock();
        inner.sessions.insert(session.token.clone(), session);
        Ok(())
    }

    async fn get_session(&self, token: &str) -> Result<Option<Session>, StorageError> {
        let mut inner = self.lock();
        let expired = matches!(
            inner.sessions.get(token),
            Some(session) if session.expires_at <= Utc::now()
        );
        if expired {
            inner.sessions.remove(token);
            return Ok(None);
        }
        Ok(inner.sessions.get(token).cloned())
    }

    async fn delete_session(&self, token: &str) -> Result<bool, StorageError> {
        let mut inner = self.lock();
        Ok(inner.sessions.remove(token).is_some())
    }
}
