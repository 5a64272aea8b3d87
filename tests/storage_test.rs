//! Storage-port contract tests
//!
//! Both adapters must satisfy the same contract: misses are `Ok(None)` or
//! `Ok(false)`, updates merge partial payloads, list operations filter by
//! foreign key, and sessions expire. The shared body runs against each
//! adapter; adapter-specific behavior (id shape, persistence, selector
//! fallback) gets its own tests.

use std::env;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use tempfile::NamedTempFile;

use stayease::database::{init_storage, StorageBackend};
use stayease::document::DocumentStorage;
use stayease::memory::MemoryStorage;
use stayease::model::{
    BookingStatus, InsertBooking, InsertHotel, InsertHotelAmenity, InsertRoom, InsertRoomAmenity,
    InsertUser, Session, UpdateHotel,
};
use stayease::storage::Storage;

// Mutex to ensure tests that modify env vars don't run in parallel
static ENV_MUTEX: Mutex<()> = Mutex::new(());

fn sample_hotel(name: &str) -> InsertHotel {
    InsertHotel {
        name: name.to_string(),
        location: "Beachfront, Miami".to_string(),
        description: "A beautiful beachfront resort.".to_string(),
        image: None,
        rating: 4.5,
        review_count: 0,
        price_per_night: 245.0,
        discount_percentage: 0,
        status: Default::default(),
    }
}

fn sample_room(hotel_id: &str) -> InsertRoom {
    InsertRoom {
        hotel_id: hotel_id.to_string(),
        name: "Junior Suite".to_string(),
        description: "Separate sleeping and living areas.".to_string(),
        image: None,
        max_guests: 3,
        bed_type: "King Bed".to_string(),
        size: Some("55m²".to_string()),
        view: Some("City View".to_string()),
        price_per_night: 255.0,
        discount_percentage: 0,
    }
}

fn sample_user(username: &str) -> InsertUser {
    InsertUser {
        username: username.to_string(),
        password: "$2b$04$notarealhashnotarealhashnotarea".to_string(),
        first_name: None,
        last_name: None,
        email: None,
        is_admin: false,
    }
}

fn sample_booking(user_id: &str, hotel_id: &str, room_id: &str) -> InsertBooking {
    InsertBooking {
        user_id: user_id.to_string(),
        hotel_id: hotel_id.to_string(),
        room_id: room_id.to_string(),
        check_in_date: "2026-09-01".parse().unwrap(),
        check_out_date: "2026-09-03".parse().unwrap(),
        guest_count: 2,
        total_price: 504.0,
        status: BookingStatus::Confirmed,
        special_requests: None,
    }
}

/// The contract every adapter must satisfy
async fn storage_contract(storage: Arc<dyn Storage>) {
    // Hotels: create, point lookup, miss
    let hotel = storage
        .create_hotel(sample_hotel("Contract Inn"))
        .await
        .unwrap();
    assert!(!hotel.id.is_empty());

    let fetched = storage.get_hotel(&hotel.id).await.unwrap();
    assert_eq!(fetched.unwrap().name, "Contract Inn");
    assert!(storage.get_hotel("does-not-exist").await.unwrap().is_none());

    // Updates merge provided fields and leave the rest alone
    let updated = storage
        .update_hotel(
            &hotel.id,
            UpdateHotel {
                price_per_night: Some(199.0),
                ..Default::default()
            },
        )
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.price_per_night, 199.0);
    assert_eq!(updated.name, "Contract Inn");
    assert_eq!(updated.rating, 4.5);
    assert!(storage
        .update_hotel("does-not-exist", UpdateHotel::default())
        .await
        .unwrap()
        .is_none());

    // Amenity lists filter by owning hotel
    storage
        .create_hotel_amenity(InsertHotelAmenity {
            hotel_id: hotel.id.clone(),
            name: "Free WiFi".to_string(),
            icon: Some("ri-wifi-line".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(
        storage.get_hotel_amenities(&hotel.id).await.unwrap().len(),
        1
    );
    assert!(storage
        .get_hotel_amenities("other-hotel")
        .await
        .unwrap()
        .is_empty());

    // Rooms and room amenities
    let room = storage.create_room(sample_room(&hotel.id)).await.unwrap();
    let rooms = storage.get_rooms_for_hotel(&hotel.id).await.unwrap();
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].id, room.id);

    storage
        .create_room_amenity(InsertRoomAmenity {
            room_id: room.id.clone(),
            name: "Mini Bar".to_string(),
            icon: Some("ri-fridge-line".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(storage.get_room_amenities(&room.id).await.unwrap().len(), 1);
    assert!(storage
        .get_room_amenities("other-room")
        .await
        .unwrap()
        .is_empty());

    // Users: lookup by id and by username
    let user = storage.create_user(sample_user("carol")).await.unwrap();
    assert_eq!(
        storage.get_user(&user.id).await.unwrap().unwrap().username,
        "carol"
    );
    assert_eq!(
        storage
            .get_user_by_username("carol")
            .await
            .unwrap()
            .unwrap()
            .id,
        user.id
    );
    assert!(storage
        .get_user_by_username("nobody")
        .await
        .unwrap()
        .is_none());

    // Bookings: creation stamps createdAt, lists filter by user, status
    // updates are visible through every lookup path
    let booking = storage
        .create_booking(sample_booking(&user.id, &hotel.id, &room.id))
        .await
        .unwrap();
    assert_eq!(booking.status, BookingStatus::Confirmed);

    let user_bookings = storage.get_user_bookings(&user.id).await.unwrap();
    assert_eq!(user_bookings.len(), 1);
    assert_eq!(user_bookings[0].id, booking.id);
    assert_eq!(user_bookings[0].created_at, booking.created_at);
    assert!(storage
        .get_user_bookings("someone-else")
        .await
        .unwrap()
        .is_empty());

    let cancelled = storage
        .update_booking_status(&booking.id, BookingStatus::Cancelled)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(cancelled.status, BookingStatus::Cancelled);
    assert_eq!(
        storage
            .get_booking(&booking.id)
            .await
            .unwrap()
            .unwrap()
            .status,
        BookingStatus::Cancelled
    );
    assert_eq!(
        storage.get_user_bookings(&user.id).await.unwrap()[0].status,
        BookingStatus::Cancelled
    );
    assert_eq!(storage.get_all_bookings().await.unwrap().len(), 1);
    assert!(storage
        .update_booking_status("does-not-exist", BookingStatus::Completed)
        .await
        .unwrap()
        .is_none());

    // Deletes report whether a removal occurred
    assert!(storage.delete_room(&room.id).await.unwrap());
    assert!(!storage.delete_room(&room.id).await.unwrap());
    assert!(storage.delete_hotel(&hotel.id).await.unwrap());
    assert!(!storage.delete_hotel(&hotel.id).await.unwrap());

    // Sessions: create, lookup, delete
    storage
        .create_session(Session {
            token: "contract-token".to_string(),
            user_id: user.id.clone(),
            expires_at: Utc::now() + Duration::hours(1),
        })
        .await
        .unwrap();
    assert!(storage
        .get_session("contract-token")
        .await
        .unwrap()
        .is_some());
    assert!(storage.delete_session("contract-token").await.unwrap());
    assert!(storage
        .get_session("contract-token")
        .await
        .unwrap()
        .is_none());
    assert!(!storage.delete_session("contract-token").await.unwrap());

    // Expired sessions read as absent
    storage
        .create_session(Session {
            token: "expired-token".to_string(),
            user_id: user.id,
            expires_at: Utc::now() - Duration::hours(1),
        })
        .await
        .unwrap();
    assert!(storage.get_session("expired-token").await.unwrap().is_none());
}

#[tokio::test]
async fn test_memory_adapter_satisfies_contract() {
    storage_contract(Arc::new(MemoryStorage::new())).await;
}

#[tokio::test]
async fn test_document_adapter_satisfies_contract() {
    let temp_db = NamedTempFile::new().expect("Failed to create temp file");
    let storage = DocumentStorage::open(temp_db.path().to_str().unwrap())
        .expect("Failed to open test database");
    storage_contract(Arc::new(storage)).await;
}

#[tokio::test]
async fn test_memory_ids_are_sequential() {
    let storage = MemoryStorage::new();
    let first = storage.create_hotel(sample_hotel("First")).await.unwrap();
    let second = storage.create_hotel(sample_hotel("Second")).await.unwrap();
    assert_eq!(first.id, "1");
    assert_eq!(second.id, "2");
}

#[tokio::test]
async fn test_memory_rejects_foreign_id_shapes() {
    let storage = MemoryStorage::new();
    storage.create_hotel(sample_hotel("Only")).await.unwrap();

    // A document-adapter-shaped id is a plain miss, never a panic
    assert!(storage.get_hotel("aB3xYz9QwErT").await.unwrap().is_none());
    assert!(!storage.delete_hotel("aB3xYz9QwErT").await.unwrap());
}

#[tokio::test]
async fn test_document_ids_are_opaque_strings() {
    let temp_db = NamedTempFile::new().expect("Failed to create temp file");
    let storage = DocumentStorage::open(temp_db.path().to_str().unwrap()).unwrap();

    let hotel = storage.create_hotel(sample_hotel("Opaque")).await.unwrap();
    assert_eq!(hotel.id.len(), 12);
    assert!(hotel.id.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[tokio::test]
async fn test_document_store_persists_across_reopen() {
    let temp_db = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = temp_db.path().to_str().unwrap().to_string();

    let hotel_id = {
        let storage = DocumentStorage::open(&db_path).unwrap();
        let hotel = storage
            .create_hotel(sample_hotel("Persistent Inn"))
            .await
            .unwrap();
        hotel.id
        // storage drops here, releasing the file lock
    };

    let storage = DocumentStorage::open(&db_path).unwrap();
    let hotel = storage.get_hotel(&hotel_id).await.unwrap();
    assert_eq!(hotel.unwrap().name, "Persistent Inn");
}

#[tokio::test]
async fn test_init_storage_memory_backend() {
    let storage = init_storage(StorageBackend::Memory, "unused.db").await;
    let hotel = storage.create_hotel(sample_hotel("Memory")).await.unwrap();
    assert_eq!(hotel.id, "1");
}

#[tokio::test]
async fn test_init_storage_falls_back_when_document_store_unusable() {
    // A directory path can never be opened as a database file, so every
    // attempt fails and the selector falls back to the in-memory adapter
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let storage = init_storage(
        StorageBackend::Document,
        temp_dir.path().to_str().unwrap(),
    )
    .await;

    // The fallback store is functional
    let hotel = storage
        .create_hotel(sample_hotel("Degraded Mode"))
        .await
        .unwrap();
    assert_eq!(
        storage
            .get_hotel(&hotel.id)
            .await
            .unwrap()
            .unwrap()
            .name,
        "Degraded Mode"
    );
}

#[tokio::test]
async fn test_storage_backend_from_env() {
    let _guard = ENV_MUTEX.lock().unwrap();

    env::set_var("STORAGE_BACKEND", "memory");
    assert_eq!(StorageBackend::from_env(), StorageBackend::Memory);

    env::set_var("STORAGE_BACKEND", "MEMORY");
    assert_eq!(StorageBackend::from_env(), StorageBackend::Memory);

    env::set_var("STORAGE_BACKEND", "document");
    assert_eq!(StorageBackend::from_env(), StorageBackend::Document);

    env::remove_var("STORAGE_BACKEND");
    assert_eq!(StorageBackend::from_env(), StorageBackend::Document);
}
