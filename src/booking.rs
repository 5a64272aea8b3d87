//! Booking lifecycle logic
//!
//! Creation validates the payload, verifies the referenced room and hotel
//! exist, resolves the total price and initial status, and persists the
//! booking. Cancellation is a guarded status transition: only the owning
//! user or an admin may cancel, and only while the booking is still in a
//! cancellable state.
//!
//! No availability check is performed against overlapping date ranges for
//! the same room; whether double-booking should be rejected is a product
//! decision that has not been made.

use std::sync::Arc;

use chrono::NaiveDate;
use validator::Validate;

use crate::error::ApiError;
use crate::model::{
    Booking, BookingStatus, BookingWithDetails, CreateBookingRequest, HotelSummary,
    InsertBooking, RoomSummary, User,
};
use crate::storage::{Storage, StorageError};

/// Fixed tax rate applied on the discounted subtotal
pub const TAX_RATE: f64 = 0.12;

/// Number of billable nights between two dates, floored at 1
pub fn nights(check_in: NaiveDate, check_out: NaiveDate) -> i64 {
    (check_out - check_in).num_days().max(1)
}

/// Nightly rate after applying a percentage discount
pub fn discounted_price(base: f64, discount_percentage: i64) -> f64 {
    base * (1.0 - discount_percentage as f64 / 100.0)
}

/// Price breakdown for a stay
#[derive(Debug, Clone, PartialEq)]
pub struct PriceQuote {
    pub nights: i64,
    pub subtotal: f64,
    pub taxes: f64,
    pub total: f64,
}

/// Computes the canonical price breakdown
///
/// The room discount applies to the nightly rate; `booking_discount_pct`
/// is a separate booking-level discount applied to the subtotal after
/// taxes are added. No booking-level discount exists in the current data
/// model, so callers pass 0 there today.
pub fn quote(
    price_per_night: f64,
    room_discount_pct: i64,
    booking_discount_pct: i64,
    check_in: NaiveDate,
    check_out: NaiveDate,
) -> PriceQuote {
    let stay_nights = nights(check_in, check_out);
    let subtotal = discounted_price(price_per_night, room_discount_pct) * stay_nights as f64;
    let taxes = subtotal * TAX_RATE;
    let total = subtotal + taxes - subtotal * (booking_discount_pct as f64 / 100.0);
    PriceQuote {
        nights: stay_nights,
        subtotal,
        taxes,
        total,
    }
}

/// Resolves the initial status of a new booking
///
/// Only the deferred-payment flow may deviate from the default; any other
/// requested status starts the booking as confirmed.
pub fn initial_status(requested: Option<BookingStatus>) -> BookingStatus {
    match requested {
        Some(BookingStatus::PendingPayment) => BookingStatus::PendingPayment,
        _ => BookingStatus::Confirmed,
    }
}

/// Creates a booking for the authenticated user
///
/// Validates the payload, rejects inverted date ranges, and verifies that
/// the referenced room and hotel both exist before persisting. When the
/// payload omits `totalPrice` it is computed from the room's nightly rate
/// and discount.
pub async fn create_booking(
    storage: &Arc<dyn Storage>,
    user: &User,
    payload: CreateBookingRequest,
) -> Result<Booking, ApiError> {
    payload.validate()?;

    if payload.check_out_date <= payload.check_in_date {
        return Err(ApiError::Validation(
            "Check-out date must be after check-in date".to_string(),
        ));
    }

    let room = storage
        .get_room(&payload.room_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Room not found".to_string()))?;

    let hotel = storage
        .get_hotel(&payload.hotel_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Hotel not found".to_string()))?;

    let total_price = match payload.total_price {
        Some(price) => price,
        None => {
            quote(
                room.price_per_night,
                room.discount_percentage,
                0,
                payload.check_in_date,
                payload.check_out_date,
            )
            .total
        }
    };

    let insert = InsertBooking {
        user_id: user.id.clone(),
        hotel_id: hotel.id,
        room_id: room.id,
        check_in_date: payload.check_in_date,
        check_out_date: payload.check_out_date,
        guest_count: payload.guest_count,
        total_price,
        status: initial_status(payload.status),
        special_requests: payload.special_requests,
    };

    Ok(storage.create_booking(insert).await?)
}

/// Cancels a booking on behalf of its owner or an admin
///
/// Cancellation is not idempotent: a booking that is already cancelled (or
/// completed) cannot be cancelled again and the attempt is rejected as a
/// conflict.
pub async fn cancel_booking(
    storage: &Arc<dyn Storage>,
    user: &User,
    booking_id: &str,
) -> Result<Booking, ApiError> {
    let booking = storage
        .get_booking(booking_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))?;

    if booking.user_id != user.id && !user.is_admin {
        return Err(ApiError::Forbidden("Forbidden".to_string()));
    }

    if !booking.status.can_cancel() {
        let message = match booking.status {
            BookingStatus::Cancelled => "Booking is already cancelled",
            _ => "Booking can no longer be cancelled",
        };
        return Err(ApiError::Conflict(message.to_string()));
    }

    storage
        .update_booking_status(booking_id, BookingStatus::Cancelled)
        .await?
        .ok_or_else(|| ApiError::NotFound("Booking not found".to_string()))
}

/// Joins the reduced hotel and room views onto a booking
///
/// The lookups are sequential per booking; listing a user's bookings does
/// one hotel and one room lookup for each entry. Either summary is `None`
/// when the referenced entity has since been deleted.
pub async fn with_details(
    storage: &Arc<dyn Storage>,
    booking: Booking,
) -> Result<BookingWithDetails, StorageError> {
    let hotel = storage
        .get_hotel(&booking.hotel_id)
        .await?
        .map(HotelSummary::from);
    let room = storage
        .get_room(&booking.room_id)
        .await?
        .map(RoomSummary::from);
    Ok(BookingWithDetails {
        booking,
        hotel,
        room,
    })
}
