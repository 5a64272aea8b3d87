//! Application entry point and server initialization
//!
//! This module contains the main function that:
//! - Loads environment configuration
//! - Selects and initializes the storage backend
//! - Starts the HTTP server with graceful shutdown support

use dotenvy::dotenv;
use std::env;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::trace::TraceLayer;

// Module declarations
mod auth;
mod booking;
mod database;
mod document;
mod error;
mod handler;
mod memory;
mod middleware;
mod model;
mod route;
mod storage;

use database::{bootstrap_admin, init_storage, AppState, StorageBackend};
use route::create_app;

/// Application entry point
///
/// 1. Loads environment variables from a `.env` file when present
/// 2. Reads configuration (`PORT`, `STORAGE_BACKEND`, `DATABASE_URL`)
/// 3. Initializes the selected storage adapter (with retry and fallback
///    for the document store)
/// 4. Optionally bootstraps the admin account
/// 5. Starts the HTTP server with graceful shutdown handling
///
/// # Environment Variables
///
/// - `PORT` - Server port number (default: 8080)
/// - `STORAGE_BACKEND` - `memory` or `document` (default: document)
/// - `DATABASE_URL` - Path to the document store file (default: "stayease.db")
/// - `ADMIN_USERNAME` / `ADMIN_PASSWORD` - Initial admin account credentials
#[tokio::main]
async fn main() {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter("stayease=debug,tower_http=debug")
        .init();

    let port_str = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
    let port: u16 = port_str.parse().unwrap_or(8080);

    let db_path = env::var("DATABASE_URL").unwrap_or_else(|_| "stayease.db".to_string());
    let backend = StorageBackend::from_env();

    // The backend choice is bound here for the process lifetime
    let storage = init_storage(backend, &db_path).await;
    bootstrap_admin(storage.as_ref()).await;

    let state = AppState { storage };
    let app = create_app(state).layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await.unwrap();

    println!("🚀 Server running at http://localhost:{}", port);
    println!("🗄️  Storage backend: {:?}", backend);

    // The server runs until it receives SIGTERM or SIGINT
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .unwrap();
}

/// Handles graceful shutdown signals
///
/// Returns when SIGINT (Ctrl+C) or SIGTERM is received, letting open
/// connections complete and storage transactions close cleanly before the
/// process exits.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    println!("\n🛑 Shutdown signal received, stopping server.");
}
