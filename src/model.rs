//! Data models for the hotel booking application
//!
//! This module defines all the data structures used throughout the application:
//! stored entity records, insert payloads, partial-update payloads and the
//! reduced projections returned to clients.
//!
//! Every entity carries an opaque `String` id. Ids are minted by the storage
//! adapter that owns the record and are only meaningful for lookups within
//! that adapter instance: the in-memory adapter formats integer counters
//! ("1", "2", ...) while the document adapter mints random alphanumeric ids.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A registered user account
///
/// The `password` field holds a bcrypt hash, never a plaintext password.
/// This struct is what adapters store; API responses use [`PublicUser`],
/// which omits the hash entirely.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    /// bcrypt password hash
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

/// Insert payload for a user record
///
/// `password` must already be hashed by the caller. Usernames are unique:
/// adapters do not enforce this, the registration handler checks before
/// inserting.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InsertUser {
    pub username: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub is_admin: bool,
}

impl InsertUser {
    pub fn into_user(self, id: String) -> User {
        User {
            id,
            username: self.username,
            password: self.password,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            is_admin: self.is_admin,
        }
    }
}

/// Public view of a user, safe to return to clients
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub username: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub is_admin: bool,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            username: user.username,
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            is_admin: user.is_admin,
        }
    }
}

/// Operational status of a hotel listing
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HotelStatus {
    #[default]
    Active,
    Maintenance,
    Inactive,
}

/// A hotel listing
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    pub id: String,
    pub name: String,
    pub location: String,
    pub description: String,
    pub image: Option<String>,
    /// 1 to 5, half-steps allowed
    pub rating: f64,
    pub review_count: i64,
    pub price_per_night: f64,
    pub discount_percentage: i64,
    pub status: HotelStatus,
}

/// Insert payload for a hotel
///
/// `reviewCount`, `discountPercentage` and `status` default to 0 / 0 /
/// `active` when omitted.
#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InsertHotel {
    #[validate(length(min = 1, message = "Hotel name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub image: Option<String>,
    #[validate(range(min = 1.0, max = 5.0, message = "Rating must be between 1 and 5"))]
    pub rating: f64,
    #[serde(default)]
    #[validate(range(min = 0, message = "Review count cannot be negative"))]
    pub review_count: i64,
    #[validate(range(exclusive_min = 0.0, message = "Price per night must be positive"))]
    pub price_per_night: f64,
    #[serde(default)]
    #[validate(range(min = 0, max = 100, message = "Discount percentage must be between 0 and 100"))]
    pub discount_percentage: i64,
    #[serde(default)]
    pub status: HotelStatus,
}

impl InsertHotel {
    pub fn into_hotel(self, id: String) -> Hotel {
        Hotel {
            id,
            name: self.name,
            location: self.location,
            description: self.description,
            image: self.image,
            rating: self.rating,
            review_count: self.review_count,
            price_per_night: self.price_per_night,
            discount_percentage: self.discount_percentage,
            status: self.status,
        }
    }
}

/// Partial-update payload for a hotel
///
/// Fields left out of the request body keep their stored value (shallow
/// merge). A provided field overwrites the stored one.
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHotel {
    pub name: Option<String>,
    pub location: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    #[validate(range(min = 1.0, max = 5.0, message = "Rating must be between 1 and 5"))]
    pub rating: Option<f64>,
    #[validate(range(min = 0, message = "Review count cannot be negative"))]
    pub review_count: Option<i64>,
    #[validate(range(exclusive_min = 0.0, message = "Price per night must be positive"))]
    pub price_per_night: Option<f64>,
    #[validate(range(min = 0, max = 100, message = "Discount percentage must be between 0 and 100"))]
    pub discount_percentage: Option<i64>,
    pub status: Option<HotelStatus>,
}

impl UpdateHotel {
    /// Merges the provided fields into an existing hotel record
    pub fn apply(self, hotel: &mut Hotel) {
        if let Some(name) = self.name {
            hotel.name = name;
        }
        if let Some(location) = self.location {
            hotel.location = location;
        }
        if let Some(description) = self.description {
            hotel.description = description;
        }
        if let Some(image) = self.image {
            hotel.image = Some(image);
        }
        if let Some(rating) = self.rating {
            hotel.rating = rating;
        }
        if let Some(review_count) = self.review_count {
            hotel.review_count = review_count;
        }
        if let Some(price_per_night) = self.price_per_night {
            hotel.price_per_night = price_per_night;
        }
        if let Some(discount_percentage) = self.discount_percentage {
            hotel.discount_percentage = discount_percentage;
        }
        if let Some(status) = self.status {
            hotel.status = status;
        }
    }
}

/// An amenity attached to a hotel (e.g. "Free WiFi")
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HotelAmenity {
    pub id: String,
    pub hotel_id: String,
    pub name: String,
    /// Icon identifier for the UI, e.g. "ri-wifi-line"
    pub icon: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InsertHotelAmenity {
    pub hotel_id: String,
    pub name: String,
    pub icon: Option<String>,
}

impl InsertHotelAmenity {
    pub fn into_amenity(self, id: String) -> HotelAmenity {
        HotelAmenity {
            id,
            hotel_id: self.hotel_id,
            name: self.name,
            icon: self.icon,
        }
    }
}

/// A bookable room belonging to a hotel
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub hotel_id: String,
    pub name: String,
    pub description: String,
    pub image: Option<String>,
    pub max_guests: i64,
    pub bed_type: String,
    pub size: Option<String>,
    pub view: Option<String>,
    pub price_per_night: f64,
    pub discount_percentage: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InsertRoom {
    pub hotel_id: String,
    #[validate(length(min = 1, message = "Room name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    pub image: Option<String>,
    #[validate(range(min = 1, message = "Max guests must be at least 1"))]
    pub max_guests: i64,
    #[validate(length(min = 1, message = "Bed type is required"))]
    pub bed_type: String,
    pub size: Option<String>,
    pub view: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "Price per night must be positive"))]
    pub price_per_night: f64,
    #[serde(default)]
    #[validate(range(min = 0, max = 100, message = "Discount percentage must be between 0 and 100"))]
    pub discount_percentage: i64,
}

impl InsertRoom {
    pub fn into_room(self, id: String) -> Room {
        Room {
            id,
            hotel_id: self.hotel_id,
            name: self.name,
            description: self.description,
            image: self.image,
            max_guests: self.max_guests,
            bed_type: self.bed_type,
            size: self.size,
            view: self.view,
            price_per_night: self.price_per_night,
            discount_percentage: self.discount_percentage,
        }
    }
}

/// Partial-update payload for a room, same merge semantics as [`UpdateHotel`]
#[derive(Serialize, Deserialize, Debug, Clone, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRoom {
    pub name: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    #[validate(range(min = 1, message = "Max guests must be at least 1"))]
    pub max_guests: Option<i64>,
    pub bed_type: Option<String>,
    pub size: Option<String>,
    pub view: Option<String>,
    #[validate(range(exclusive_min = 0.0, message = "Price per night must be positive"))]
    pub price_per_night: Option<f64>,
    #[validate(range(min = 0, max = 100, message = "Discount percentage must be between 0 and 100"))]
    pub discount_percentage: Option<i64>,
}

impl UpdateRoom {
    pub fn apply(self, room: &mut Room) {
        if let Some(name) = self.name {
            room.name = name;
        }
        if let Some(description) = self.description {
            room.description = description;
        }
        if let Some(image) = self.image {
            room.image = Some(image);
        }
        if let Some(max_guests) = self.max_guests {
            room.max_guests = max_guests;
        }
        if let Some(bed_type) = self.bed_type {
            room.bed_type = bed_type;
        }
        if let Some(size) = self.size {
            room.size = Some(size);
        }
        if let Some(view) = self.view {
            room.view = Some(view);
        }
        if let Some(price_per_night) = self.price_per_night {
            room.price_per_night = price_per_night;
        }
        if let Some(discount_percentage) = self.discount_percentage {
            room.discount_percentage = discount_percentage;
        }
    }
}

/// An amenity attached to a room
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RoomAmenity {
    pub id: String,
    pub room_id: String,
    pub name: String,
    pub icon: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InsertRoomAmenity {
    pub room_id: String,
    pub name: String,
    pub icon: Option<String>,
}

impl InsertRoomAmenity {
    pub fn into_amenity(self, id: String) -> RoomAmenity {
        RoomAmenity {
            id,
            room_id: self.room_id,
            name: self.name,
            icon: self.icon,
        }
    }
}

/// Lifecycle status of a booking
///
/// A booking starts as `Confirmed`, or `PendingPayment` when the client
/// requests the deferred-payment flow. The owning user may move it to
/// `Cancelled` while it is still cancellable; admins may set any status.
/// `Cancelled` and `Completed` are terminal for user-initiated transitions.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
    #[default]
    Confirmed,
    Cancelled,
    Completed,
    PendingPayment,
}

impl BookingStatus {
    /// Whether a user-initiated cancellation is still allowed
    pub fn can_cancel(self) -> bool {
        matches!(self, BookingStatus::Confirmed | BookingStatus::PendingPayment)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Completed => "completed",
            BookingStatus::PendingPayment => "pending_payment",
        }
    }

    /// Parses the wire representation, returning `None` for unknown strings
    pub fn parse(value: &str) -> Option<BookingStatus> {
        match value {
            "confirmed" => Some(BookingStatus::Confirmed),
            "cancelled" => Some(BookingStatus::Cancelled),
            "completed" => Some(BookingStatus::Completed),
            "pending_payment" => Some(BookingStatus::PendingPayment),
            _ => None,
        }
    }
}

/// A room booking
///
/// `createdAt` is stamped once by the storage adapter at creation and never
/// changes. Bookings are never hard-deleted; lifecycle changes go through
/// status updates only.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: String,
    pub user_id: String,
    pub hotel_id: String,
    pub room_id: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub guest_count: i64,
    pub total_price: f64,
    pub status: BookingStatus,
    pub special_requests: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a booking record, fully resolved by the lifecycle
/// layer: `user_id` comes from the session, `total_price` and `status` have
/// been computed, and the referenced hotel and room have been verified to
/// exist.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InsertBooking {
    pub user_id: String,
    pub hotel_id: String,
    pub room_id: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    pub guest_count: i64,
    pub total_price: f64,
    pub status: BookingStatus,
    pub special_requests: Option<String>,
}

impl InsertBooking {
    pub fn into_booking(self, id: String, created_at: DateTime<Utc>) -> Booking {
        Booking {
            id,
            user_id: self.user_id,
            hotel_id: self.hotel_id,
            room_id: self.room_id,
            check_in_date: self.check_in_date,
            check_out_date: self.check_out_date,
            guest_count: self.guest_count,
            total_price: self.total_price,
            status: self.status,
            special_requests: self.special_requests,
            created_at,
        }
    }
}

/// An authenticated session, stored through the storage port
///
/// Sessions expire 24 hours after creation; expired sessions behave as
/// absent on lookup.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user_id: String,
    pub expires_at: DateTime<Utc>,
}

/// Reduced hotel view joined into booking responses
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct HotelSummary {
    pub id: String,
    pub name: String,
    pub location: String,
    pub image: Option<String>,
    pub rating: f64,
}

impl From<Hotel> for HotelSummary {
    fn from(hotel: Hotel) -> Self {
        HotelSummary {
            id: hotel.id,
            name: hotel.name,
            location: hotel.location,
            image: hotel.image,
            rating: hotel.rating,
        }
    }
}

/// Reduced room view joined into booking responses
#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub id: String,
    pub name: String,
    pub bed_type: String,
    pub max_guests: i64,
}

impl From<Room> for RoomSummary {
    fn from(room: Room) -> Self {
        RoomSummary {
            id: room.id,
            name: room.name,
            bed_type: room.bed_type,
            max_guests: room.max_guests,
        }
    }
}

/// A room with its amenities, nested in the hotel detail response
#[derive(Serialize, Debug, Clone)]
pub struct RoomWithAmenities {
    #[serde(flatten)]
    pub room: Room,
    pub amenities: Vec<RoomAmenity>,
}

/// Hotel detail response: the hotel plus its amenities and rooms
#[derive(Serialize, Debug, Clone)]
pub struct HotelDetail {
    #[serde(flatten)]
    pub hotel: Hotel,
    pub amenities: Vec<HotelAmenity>,
    pub rooms: Vec<RoomWithAmenities>,
}

/// A booking joined with reduced hotel and room views
///
/// The summaries are `None` when the referenced entity has since been
/// deleted (no cascade is enforced).
#[derive(Serialize, Debug, Clone)]
pub struct BookingWithDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub hotel: Option<HotelSummary>,
    pub room: Option<RoomSummary>,
}

/// Request payload for `POST /api/register`
#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

/// Request payload for `POST /api/login`
#[derive(Deserialize, Debug)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Request payload for `POST /api/bookings`
///
/// `userId` is taken from the session, never from the body. `totalPrice` is
/// optional: when omitted the server computes it from the room's nightly
/// rate. `status` is only honored for the `pending_payment` flow; anything
/// else starts as `confirmed`.
#[derive(Deserialize, Debug, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub hotel_id: String,
    pub room_id: String,
    pub check_in_date: NaiveDate,
    pub check_out_date: NaiveDate,
    #[validate(range(min = 1, message = "Guest count must be at least 1"))]
    pub guest_count: i64,
    #[validate(range(exclusive_min = 0.0, message = "Total price must be positive"))]
    pub total_price: Option<f64>,
    pub status: Option<BookingStatus>,
    pub special_requests: Option<String>,
}

/// Request payload for `PATCH /api/admin/bookings/:id/status`
///
/// The status arrives as a raw string and is parsed against
/// [`BookingStatus`]; unknown values are rejected with a validation error.
#[derive(Deserialize, Debug)]
pub struct StatusUpdateRequest {
    pub status: String,
}
