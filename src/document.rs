//! Document-store adapter backed by embedded redb
//!
//! One table per entity collection, keyed by an opaque string id with the
//! record JSON-serialized as the value. Bookings additionally maintain a
//! secondary index table keyed by `"{user_id}:{timestamp_micros}"` so the
//! per-user booking list is a range query instead of a full scan; the
//! timestamp component keeps entries chronologically ordered and unique.
//!
//! Backend failures are propagated as [`StorageError`], never swallowed:
//! callers can always distinguish a missing record (`Ok(None)`) from a
//! store that could not be read.

use async_trait::async_trait;
use chrono::Utc;
use rand::{distr::Alphanumeric, Rng};
use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::model::{
    Booking, BookingStatus, Hotel, HotelAmenity, InsertBooking, InsertHotel, InsertHotelAmenity,
    InsertRoom, InsertRoomAmenity, InsertUser, Room, RoomAmenity, Session, UpdateHotel,
    UpdateRoom, User,
};
use crate::storage::{Storage, StorageError};

/// User accounts, keyed by user id
const TABLE_USERS: TableDefinition<&str, &str> = TableDefinition::new("users_v1");

/// Hotel listings, keyed by hotel id
const TABLE_HOTELS: TableDefinition<&str, &str> = TableDefinition::new("hotels_v1");

/// Hotel amenities, keyed by amenity id
const TABLE_HOTEL_AMENITIES: TableDefinition<&str, &str> =
    TableDefinition::new("hotel_amenities_v1");

/// Rooms, keyed by room id
const TABLE_ROOMS: TableDefinition<&str, &str> = TableDefinition::new("rooms_v1");

/// Room amenities, keyed by amenity id
const TABLE_ROOM_AMENITIES: TableDefinition<&str, &str> =
    TableDefinition::new("room_amenities_v1");

/// Bookings, keyed by booking id
const TABLE_BOOKINGS: TableDefinition<&str, &str> = TableDefinition::new("bookings_v1");

/// Secondary index for bookings by user
///
/// Key: composite key in format `"{user_id}:{timestamp_micros}"`
/// Value: the same JSON document stored in [`TABLE_BOOKINGS`]
const TABLE_USER_BOOKINGS: TableDefinition<&str, &str> =
    TableDefinition::new("user_bookings_v1");

/// Sessions, keyed by session token
const TABLE_SESSIONS: TableDefinition<&str, &str> = TableDefinition::new("sessions_v1");

/// Length of generated document ids
const ID_LEN: usize = 12;

/// Mints a random alphanumeric document id
fn generate_id() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(ID_LEN)
        .map(char::from)
        .collect()
}

/// Composite key for the bookings-by-user index
fn user_booking_key(booking: &Booking) -> String {
    format!(
        "{}:{}",
        booking.user_id,
        booking.created_at.timestamp_micros()
    )
}

pub struct DocumentStorage {
    db: Database,
}

impl DocumentStorage {
    /// Creates or opens the database file and ensures all tables exist
    pub fn open(db_path: &str) -> Result<Self, StorageError> {
        let db = Database::create(db_path)?;

        let write_txn = db.begin_write()?;
        {
            write_txn.open_table(TABLE_USERS)?;
            write_txn.open_table(TABLE_HOTELS)?;
            write_txn.open_table(TABLE_HOTEL_AMENITIES)?;
            write_txn.open_table(TABLE_ROOMS)?;
            write_txn.open_table(TABLE_ROOM_AMENITIES)?;
            write_txn.open_table(TABLE_BOOKINGS)?;
            write_txn.open_table(TABLE_USER_BOOKINGS)?;
            write_txn.open_table(TABLE_SESSIONS)?;
        }
        write_txn.commit()?;

        Ok(DocumentStorage { db })
    }

    /// Point lookup of one document by id
    fn read_doc<T: DeserializeOwned>(
        &self,
        table_def: TableDefinition<&str, &str>,
        id: &str,
    ) -> Result<Option<T>, StorageError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table_def)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_str(value.value())?)),
            None => Ok(None),
        }
    }

    /// Reads every document in a table; callers filter as needed
    fn scan_docs<T: DeserializeOwned>(
        &self,
        table_def: TableDefinition<&str, &str>,
    ) -> Result<Vec<T>, StorageError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(table_def)?;
        let mut docs = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            docs.push(serde_json::from_str(value.value())?);
        }
        Ok(docs)
    }

    /// Inserts or overwrites one document
    fn put_doc<T: Serialize>(
        &self,
        table_def: TableDefinition<&str, &str>,
        id: &str,
        doc: &T,
    ) -> Result<(), StorageError> {
        let json = serde_json::to_string(doc)?;
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(table_def)?;
            table.insert(id, json.as_str())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Removes one document, reporting whether a removal occurred
    fn remove_doc(
        &self,
        table_def: TableDefinition<&str, &str>,
        id: &str,
    ) -> Result<bool, StorageError> {
        let write_txn = self.db.begin_write()?;
        let removed = {
            let mut table = write_txn.open_table(table_def)?;
            let existed = table.remove(id)?.is_some();
            existed
        };
        write_txn.commit()?;
        Ok(removed)
    }
}

#[async_trait]
impl Storage for DocumentStorage {
    async fn get_user(&self, id: &str) -> Result<Option<User>, StorageError> {
        self.read_doc(TABLE_USERS, id)
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, StorageError> {
        let users: Vec<User> = self.scan_docs(TABLE_USERS)?;
        Ok(users.into_iter().find(|user| user.username == username))
    }

    async fn create_user(&self, user: InsertUser) -> Result<User, StorageError> {
        let id = generate_id();
        let user = user.into_user(id);
        self.put_doc(TABLE_USERS, &user.id, &user)?;
        Ok(user)
    }

    async fn get_all_hotels(&self) -> Result<Vec<Hotel>, StorageError> {
        self.scan_docs(TABLE_HOTELS)
    }

    async fn get_hotel(&self, id: &str) -> Result<Option<Hotel>, StorageError> {
        self.read_doc(TABLE_HOTELS, id)
    }

    async fn create_hotel(&self, hotel: InsertHotel) -> Result<Hotel, StorageError> {
        let id = generate_id();
        let hotel = hotel.into_hotel(id);
        self.put_doc(TABLE_HOTELS, &hotel.id, &hotel)?;
        Ok(hotel)
    }

    async fn update_hotel(
        &self,
        id: &str,
        update: UpdateHotel,
    ) -> Result<Option<Hotel>, StorageError> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(TABLE_HOTELS)?;
            let current: Option<Hotel> = match table.get(id)? {
                Some(value) => Some(serde_json::from_str(value.value())?),
                None => None,
            };
            match current {
                Some(mut hotel) => {
                    update.apply(&mut hotel);
                    let json = serde_json::to_string(&hotel)?;
                    table.insert(id, json.as_str())?;
                    Some(hotel)
                }
                None => None,
            }
        };
        write_txn.commit()?;
        Ok(updated)
    }

    async fn delete_hotel(&self, id: &str) -> Result<bool, StorageError> {
        self.remove_doc(TABLE_HOTELS, id)
    }

    async fn get_hotel_amenities(
        &self,
        hotel_id: &str,
    ) -> Result<Vec<HotelAmenity>, StorageError> {
        let amenities: Vec<HotelAmenity> = self.scan_docs(TABLE_HOTEL_AMENITIES)?;
        Ok(amenities
            .into_iter()
            .filter(|amenity| amenity.hotel_id == hotel_id)
            .collect())
    }

    async fn create_hotel_amenity(
        &self,
        amenity: InsertHotelAmenity,
    ) -> Result<HotelAmenity, StorageError> {
        let id = generate_id();
        let amenity = amenity.into_amenity(id);
        self.put_doc(TABLE_HOTEL_AMENITIES, &amenity.id, &amenity)?;
        Ok(amenity)
    }

    async fn get_rooms_for_hotel(&self, hotel_id: &str) -> Result<Vec<Room>, StorageError> {
        let rooms: Vec<Room> = self.scan_docs(TABLE_ROOMS)?;
        Ok(rooms
            .into_iter()
            .filter(|room| room.hotel_id == hotel_id)
            .collect())
    }

    async fn get_room(&self, id: &str) -> Result<Option<Room>, StorageError> {
        self.read_doc(TABLE_ROOMS, id)
    }

    async fn create_room(&self, room: InsertRoom) -> Result<Room, StorageError> {
        let id = generate_id();
        let room = room.into_room(id);
        self.put_doc(TABLE_ROOMS, &room.id, &room)?;
        Ok(room)
    }

    async fn update_room(
        &self,
        id: &str,
        update: UpdateRoom,
    ) -> Result<Option<Room>, StorageError> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(TABLE_ROOMS)?;
            let current: Option<Room> = match table.get(id)? {
                Some(value) => Some(serde_json::from_str(value.value())?),
                None => None,
            };
            match current {
                Some(mut room) => {
                    update.apply(&mut room);
                    let json = serde_json::to_string(&room)?;
                    table.insert(id, json.as_str())?;
                    Some(room)
                }
                None => None,
            }
        };
        write_txn.commit()?;
        Ok(updated)
    }

    async fn delete_room(&self, id: &str) -> Result<bool, StorageError> {
        self.remove_doc(TABLE_ROOMS, id)
    }

    async fn get_room_amenities(&self, room_id: &str) -> Result<Vec<RoomAmenity>, StorageError> {
        let amenities: Vec<RoomAmenity> = self.scan_docs(TABLE_ROOM_AMENITIES)?;
        Ok(amenities
            .into_iter()
            .filter(|amenity| amenity.room_id == room_id)
            .collect())
    }

    async fn create_room_amenity(
        &self,
        amenity: InsertRoomAmenity,
    ) -> Result<RoomAmenity, StorageError> {
        let id = generate_id();
        let amenity = amenity.into_amenity(id);
        self.put_doc(TABLE_ROOM_AMENITIES, &amenity.id, &amenity)?;
        Ok(amenity)
    }

    async fn get_booking(&self, id: &str) -> Result<Option<Booking>, StorageError> {
        self.read_doc(TABLE_BOOKINGS, id)
    }

    async fn get_user_bookings(&self, user_id: &str) -> Result<Vec<Booking>, StorageError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(TABLE_USER_BOOKINGS)?;

        // Range boundaries covering every "{user_id}:{timestamp}" key: the
        // character '{' is lexicographically after ':', so it closes the
        // range without matching any other user's prefix.
        let start_key = format!("{}:", user_id);
        let end_key = format!("{}:{{", user_id);

        let mut bookings = Vec::new();
        for entry in table.range(start_key.as_str()..end_key.as_str())? {
            let (_, value) = entry?;
            bookings.push(serde_json::from_str(value.value())?);
        }
        Ok(bookings)
    }

    async fn get_all_bookings(&self) -> Result<Vec<Booking>, StorageError> {
        self.scan_docs(TABLE_BOOKINGS)
    }

    async fn create_booking(&self, booking: InsertBooking) -> Result<Booking, StorageError> {
        let id = generate_id();
        let booking = booking.into_booking(id, Utc::now());
        let json = serde_json::to_string(&booking)?;
        let index_key = user_booking_key(&booking);

        // Both the primary row and the index row go in one transaction
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(TABLE_BOOKINGS)?;
            table.insert(booking.id.as_str(), json.as_str())?;

            let mut index = write_txn.open_table(TABLE_USER_BOOKINGS)?;
            index.insert(index_key.as_str(), json.as_str())?;
        }
        write_txn.commit()?;

        Ok(booking)
    }

    async fn update_booking_status(
        &self,
        id: &str,
        status: BookingStatus,
    ) -> Result<Option<Booking>, StorageError> {
        let write_txn = self.db.begin_write()?;
        let updated = {
            let mut table = write_txn.open_table(TABLE_BOOKINGS)?;
            let current: Option<Booking> = match table.get(id)? {
                Some(value) => Some(serde_json::from_str(value.value())?),
                None => None,
            };
            match current {
                Some(mut booking) => {
                    booking.status = status;
                    let json = serde_json::to_string(&booking)?;
                    table.insert(id, json.as_str())?;

                    // The index stores a copy of the document, so the same
                    // composite key must be rewritten as well
                    let index_key = user_booking_key(&booking);
                    let mut index = write_txn.open_table(TABLE_USER_BOOKINGS)?;
                    index.insert(index_key.as_str(), json.as_str())?;
                    Some(booking)
                }
                None => None,
            }
        };
        write_txn.commit()?;
        Ok(updated)
    }

    async fn create_session(&self, session: Session) -> Result<(), StorageError> {
        self.put_doc(TABLE_SESSIONS, &session.token, &session)
    }

    async fn get_session(&self, token: &str) -> Result<Option<Session>, StorageError> {
        let session: Option<Session> = self.read_doc(TABLE_SESSIONS, token)?;
        match session {
            Some(session) if session.expires_at <= Utc::now() => {
                self.remove_doc(TABLE_SESSIONS, token)?;
                Ok(None)
            }
            other => Ok(other),
        }
    }

    async fn delete_session(&self, token: &str) -> Result<bool, StorageError> {
        self.remove_doc(TABLE_SESSIONS, token)
    }
}
