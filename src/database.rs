//! Storage backend selection and initialization
//!
//! The backend is resolved once from the environment at startup and bound
//! into [`AppState`] for the lifetime of the process; there is no runtime
//! hot-swap. Opening the document store is retried a bounded number of
//! times, and on exhaustion the process falls back to the in-memory
//! adapter with a warning rather than serving every request a 503 from a
//! dead backend.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use crate::document::DocumentStorage;
use crate::memory::MemoryStorage;
use crate::model::InsertUser;
use crate::storage::Storage;

/// Number of attempts to open the document store before falling back
pub const CONNECT_ATTEMPTS: u32 = 3;

/// Fixed delay between connection attempts
pub const RETRY_DELAY: Duration = Duration::from_secs(3);

/// Which storage adapter backs the process
///
/// Resolved once from `STORAGE_BACKEND`; the in-memory adapter keeps no
/// state across restarts and exists for development and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Document,
}

impl StorageBackend {
    /// Reads `STORAGE_BACKEND` from the environment, defaulting to the
    /// document store
    pub fn from_env() -> Self {
        match env::var("STORAGE_BACKEND").map(|value| value.to_lowercase()) {
            Ok(value) if value == "memory" => StorageBackend::Memory,
            _ => StorageBackend::Document,
        }
    }
}

/// Application state shared across all request handlers
///
/// The storage adapter is injected here at bootstrap; handlers never reach
/// for a global, so tests can substitute any [`Storage`] implementation.
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
}

/// Initializes the selected storage adapter
///
/// For the document backend this attempts to open the database file up to
/// [`CONNECT_ATTEMPTS`] times with [`RETRY_DELAY`] between attempts. When
/// every attempt fails, a warning is logged and the in-memory adapter is
/// returned instead, so the process comes up in a degraded but functional
/// state.
pub async fn init_storage(backend: StorageBackend, db_path: &str) -> Arc<dyn Storage> {
    match backend {
        StorageBackend::Memory => {
            tracing::info!("using in-memory storage");
            Arc::new(MemoryStorage::new())
        }
        StorageBackend::Document => {
            for attempt in 1..=CONNECT_ATTEMPTS {
                match DocumentStorage::open(db_path) {
                    Ok(store) => {
                        tracing::info!(path = %db_path, "document store ready");
                        return Arc::new(store);
                    }
                    Err(err) => {
                        tracing::error!(
                            error = %err,
                            attempt,
                            "failed to open document store"
                        );
                        if attempt < CONNECT_ATTEMPTS {
                            tracing::info!(
                                "retrying in {} seconds...",
                                RETRY_DELAY.as_secs()
                            );
                            tokio::time::sleep(RETRY_DELAY).await;
                        }
                    }
                }
            }
            tracing::warn!(
                "document store unavailable after {} attempts, falling back to in-memory storage",
                CONNECT_ATTEMPTS
            );
            Arc::new(MemoryStorage::new())
        }
    }
}

/// Creates the initial admin account when `ADMIN_USERNAME` and
/// `ADMIN_PASSWORD` are set and the username is still free
///
/// Registration always produces non-admin accounts, so without this
/// bootstrap an admin can never exist. Failures are logged and ignored;
/// the server is still useful without an admin account.
pub async fn bootstrap_admin(storage: &dyn Storage) {
    let (Ok(username), Ok(password)) = (env::var("ADMIN_USERNAME"), env::var("ADMIN_PASSWORD"))
    else {
        return;
    };

    match storage.get_user_by_username(&username).await {
        Ok(Some(_)) => return,
        Ok(None) => {}
        Err(err) => {
            tracing::warn!(error = %err, "admin bootstrap: lookup failed");
            return;
        }
    }

    let hash = match bcrypt::hash(&password, bcrypt::DEFAULT_COST) {
        Ok(hash) => hash,
        Err(err) => {
            tracing::warn!(error = %err, "admin bootstrap: password hashing failed");
            return;
        }
    };

    let admin = InsertUser {
        username: username.clone(),
        password: hash,
        first_name: None,
        last_name: None,
        email: None,
        is_admin: true,
    };
    match storage.create_user(admin).await {
        Ok(_) => tracing::info!(%username, "admin account created"),
        Err(err) => tracing::warn!(error = %err, "admin bootstrap: create failed"),
    }
}
