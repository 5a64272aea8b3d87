//! HTTP request handlers for hotels, rooms and bookings
//!
//! Handlers are thin: they validate payloads, call through the storage
//! port (or the booking lifecycle layer), and translate misses into 404s.
//! Authentication and admin checks happen in the middleware layer before a
//! handler runs; handlers that need the caller read the injected
//! [`CurrentUser`] extension.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use validator::Validate;

use crate::booking;
use crate::database::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::model::{
    Booking, BookingStatus, BookingWithDetails, CreateBookingRequest, Hotel, HotelDetail,
    InsertHotel, InsertRoom, Room, RoomWithAmenities, StatusUpdateRequest, UpdateHotel,
    UpdateRoom,
};

/// Lists all hotels
pub async fn list_hotels(State(state): State<AppState>) -> Result<Json<Vec<Hotel>>, ApiError> {
    Ok(Json(state.storage.get_all_hotels().await?))
}

/// Hotel detail: the hotel, its amenities and its rooms, each room with
/// its own amenities
pub async fn get_hotel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<HotelDetail>, ApiError> {
    let hotel = state
        .storage
        .get_hotel(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Hotel not found".to_string()))?;

    let amenities = state.storage.get_hotel_amenities(&id).await?;
    let rooms = state.storage.get_rooms_for_hotel(&id).await?;

    let mut rooms_with_amenities = Vec::with_capacity(rooms.len());
    for room in rooms {
        let amenities = state.storage.get_room_amenities(&room.id).await?;
        rooms_with_amenities.push(RoomWithAmenities { room, amenities });
    }

    Ok(Json(HotelDetail {
        hotel,
        amenities,
        rooms: rooms_with_amenities,
    }))
}

/// Creates a hotel (admin)
pub async fn create_hotel(
    State(state): State<AppState>,
    Json(payload): Json<InsertHotel>,
) -> Result<(StatusCode, Json<Hotel>), ApiError> {
    payload.validate()?;
    let hotel = state.storage.create_hotel(payload).await?;
    Ok((StatusCode::CREATED, Json(hotel)))
}

/// Partially updates a hotel (admin)
pub async fn update_hotel(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateHotel>,
) -> Result<Json<Hotel>, ApiError> {
    payload.validate()?;
    state
        .storage
        .update_hotel(&id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Hotel not found".to_string()))
}

/// Deletes a hotel (admin)
pub async fn delete_hotel(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.storage.delete_hotel(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Hotel not found".to_string()))
    }
}

/// Creates a room (admin)
pub async fn create_room(
    State(state): State<AppState>,
    Json(payload): Json<InsertRoom>,
) -> Result<(StatusCode, Json<Room>), ApiError> {
    payload.validate()?;
    let room = state.storage.create_room(payload).await?;
    Ok((StatusCode::CREATED, Json(room)))
}

/// Partially updates a room (admin)
pub async fn update_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateRoom>,
) -> Result<Json<Room>, ApiError> {
    payload.validate()?;
    state
        .storage
        .update_room(&id, payload)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Room not found".to_string()))
}

/// Deletes a room (admin)
pub async fn delete_room(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.storage.delete_room(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound("Room not found".to_string()))
    }
}

/// Creates a booking for the authenticated user
pub async fn create_booking(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    let booking = booking::create_booking(&state.storage, &current.user, payload).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// Lists the authenticated user's bookings with joined hotel and room
/// summaries
pub async fn list_bookings(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<Vec<BookingWithDetails>>, ApiError> {
    let bookings = state.storage.get_user_bookings(&current.user.id).await?;

    let mut detailed = Vec::with_capacity(bookings.len());
    for entry in bookings {
        detailed.push(booking::with_details(&state.storage, entry).await?);
    }

    Ok(Json(detailed))
}

/// Fetches one booking, visible to its owner or an admin
pub async fn get_booking(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<BookingWithDetails>, ApiError> {
    let booking = state
        .storage
        .get_booking(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    if booking.user_id != current.user.id && !current.user.is_admin {
        return Err(ApiError::Forbidden("Forbidden".to_string()));
    }

    Ok(Json(booking::with_details(&state.storage, booking).await?))
}

/// Cancels a booking on behalf of its owner or an admin
pub async fn cancel_booking(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Json<Booking>, ApiError> {
    let booking = booking::cancel_booking(&state.storage, &current.user, &id).await?;
    Ok(Json(booking))
}

/// Lists every booking across all users (admin)
pub async fn list_all_bookings(
    State(state): State<AppState>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    Ok(Json(state.storage.get_all_bookings().await?))
}

/// Sets a booking's status (admin)
///
/// The status string is parsed against the enum; admins may set any valid
/// status without going through the user-facing transition guard.
pub async fn update_booking_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<StatusUpdateRequest>,
) -> Result<Json<Booking>, ApiError> {
    let status = BookingStatus::parse(&payload.status)
        .ok_or_else(|| ApiError::Validation("Invalid booking status".to_string()))?;

    state
        .storage
        .update_booking_status(&id, status)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))
}
