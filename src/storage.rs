//! Storage port: the persistence interface the HTTP layer is written against
//!
//! Two adapters implement this trait: [`crate::memory::MemoryStorage`] and
//! [`crate::document::DocumentStorage`]. One of them is chosen at startup
//! (see [`crate::database`]) and injected into the router state as
//! `Arc<dyn Storage>`, so tests can substitute whichever backend they want.
//!
//! "Not found" is a normal return value, never an error: lookups return
//! `Ok(None)` and deletes return `Ok(false)` for absent ids. `Err` is
//! reserved for real backend failure, which the HTTP layer surfaces as 503
//! so clients can tell "absent" apart from "backend down".

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{
    Booking, BookingStatus, Hotel, HotelAmenity, InsertBooking, InsertHotel, InsertHotelAmenity,
    InsertRoom, InsertRoomAmenity, InsertUser, Room, RoomAmenity, Session, UpdateHotel,
    UpdateRoom, User,
};

/// Failure of the storage backend itself
///
/// Distinct from "record absent": a miss is `Ok(None)` on the operation,
/// while `StorageError` means the backend could not be read or written.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The backing store could not be opened, read or written
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),

    /// A stored document failed to deserialize
    #[error("corrupt record in storage: {0}")]
    Corrupt(#[from] serde_json::Error),
}

impl From<redb::DatabaseError> for StorageError {
    fn from(err: redb::DatabaseError) -> Self {
        StorageError::Unavailable(err.to_string())
    }
}

impl From<redb::TransactionError> for StorageError {
    fn from(err: redb::TransactionError) -> Self {
        StorageError::Unavailable(err.to_string())
    }
}

impl From<redb::TableError> for StorageError {
    fn from(err: redb::TableError) -> Self {
        StorageError::Unavailable(err.to_string())
    }
}

impl From<redb::StorageError> for StorageError {
    fn from(err: redb::StorageError) -> Self {
        StorageError::Unavailable(err.to_string())
    }
}

impl From<redb::CommitError> for StorageError {
    fn from(err: redb::CommitError) -> Self {
        StorageError::Unavailable(err.to_string())
    }
}

/// The full persistence contract of the application
///
/// Ids are opaque strings minted by the adapter; an id from one adapter is
/// a plain miss in the other. Update operations merge partial payloads into
/// the stored record and return `Ok(None)` when the id is absent.
#[async_trait]
pub trait Storage: Send + Sync {
    // User operations
    async fn get_user(&self, id: &str) -> Result<Option<User>, StorageError>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError>;
    async fn create_user(&self, user: InsertUser) -> Result<User, StorageError>;

    // Hotel operations
    async fn get_all_hotels(&self) -> Result<Vec<Hotel>, StorageError>;
    async fn get_hotel(&self, id: &str) -> Result<Option<Hotel>, StorageError>;
    async fn create_hotel(&self, hotel: InsertHotel) -> Result<Hotel, StorageError>;
    async fn update_hotel(
        &self,
        id: &str,
        update: UpdateHotel,
    ) -> Result<Option<Hotel>, StorageError>;
    async fn delete_hotel(&self, id: &str) -> Result<bool, StorageError>;

    // Hotel amenity operations
    async fn get_hotel_amenities(&self, hotel_id: &str)
        -> Result<Vec<HotelAmenity>, StorageError>;
    async fn create_hotel_amenity(
        &self,
        amenity: InsertHotelAmenity,
    ) -> Result<HotelAmenity, StorageError>;

    // Room operations
    async fn get_rooms_for_hotel(&self, hotel_id: &str) -> Result<Vec<Room>, StorageError>;
    async fn get_room(&self, id: &str) -> Result<Option<Room>, StorageError>;
    async fn create_room(&self, room: InsertRoom) -> Result<Room, StorageError>;
    async fn update_room(&self, id: &str, update: UpdateRoom)
        -> Result<Option<Room>, StorageError>;
    async fn delete_room(&self, id: &str) -> Result<bool, StorageError>;

    // Room amenity operations
    async fn get_room_amenities(&self, room_id: &str) -> Result<Vec<RoomAmenity>, StorageError>;
    async fn create_room_amenity(
        &self,
        amenity: InsertRoomAmenity,
    ) -> Result<RoomAmenity, StorageError>;

    // Booking operations
    async fn get_booking(&self, id: &str) -> Result<Option<Booking>, StorageError>;
    async fn get_user_bookings(&self, user_id: &str) -> Result<Vec<Booking>, StorageError>;
    async fn get_all_bookings(&self) -> Result<Vec<Booking>, StorageError>;
    async fn create_booking(&self, booking: InsertBooking) -> Result<Booking, StorageError>;
    async fn update_booking_status(
        &self,
        id: &str,
        status: BookingStatus,
    ) -> Result<Option<Booking>, StorageError>;

    // Session operations
    async fn create_session(&self, session: Session) -> Result<(), StorageError>;
    async fn get_session(&self, token: &str) -> Result<Option<Session>, StorageError>;
    async fn delete_session(&self, token: &str) -> Result<bool, StorageError>;
}
