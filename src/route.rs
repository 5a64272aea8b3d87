//! Route definitions for the hotel booking API
//!
//! This module configures all HTTP routes and maps them to their handlers.
//! Routes are grouped by the access they require: public, authenticated
//! session, and admin (auth plus the admin check).

use axum::routing::{get, patch, post, put};
use axum::{middleware, Router};

use crate::auth::{current_user, login, logout, register};
use crate::database::AppState;
use crate::handler::{
    cancel_booking, create_booking, create_hotel, create_room, delete_hotel, delete_room,
    get_booking, get_hotel, list_all_bookings, list_bookings, list_hotels, update_booking_status,
    update_hotel, update_room,
};
use crate::middleware::{admin_middleware, auth_middleware};

/// Creates and configures the Axum application router with all routes
///
/// # Route Groups
///
/// - Public: hotel browsing, register, login
/// - Session: booking management, logout, current user
/// - Admin (nested under `/api/admin`): hotel/room CRUD, booking oversight
///
/// The storage adapter travels inside `state`; nothing here touches a
/// global, so tests construct the app around whatever adapter they want.
pub fn create_app(state: AppState) -> Router {
    // Admin routes: auth runs first, then the admin check
    let admin_routes = Router::new()
        .route("/hotels", post(create_hotel))
        .route("/hotels/{id}", put(update_hotel).delete(delete_hotel))
        .route("/rooms", post(create_room))
        .route("/rooms/{id}", put(update_room).delete(delete_room))
        .route("/bookings", get(list_all_bookings))
        .route("/bookings/{id}/status", patch(update_booking_status))
        .layer(middleware::from_fn(admin_middleware))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Routes requiring an authenticated session
    let session_routes = Router::new()
        .route("/bookings", get(list_bookings).post(create_booking))
        .route("/bookings/{id}", get(get_booking))
        .route("/bookings/{id}/cancel", patch(cancel_booking))
        .route("/user", get(current_user))
        .route("/logout", get(logout))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Public routes: no session required
    let public_routes = Router::new()
        .route("/hotels", get(list_hotels))
        .route("/hotels/{id}", get(get_hotel))
        .route("/register", post(register))
        .route("/login", post(login));

    let api_routes = public_routes
        .merge(session_routes)
        .nest("/admin", admin_routes);

    Router::new().nest("/api", api_routes).with_state(state)
}
