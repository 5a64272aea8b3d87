//! Authentication handlers: register, login, logout and the current-user
//! endpoint
//!
//! Sessions are opaque random tokens stored through the storage port and
//! carried in an HttpOnly cookie. Registration hashes the password with
//! bcrypt and, like the original flow, logs the new user straight in.

use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::{Extension, Json};
use chrono::{Duration, Utc};
use rand::{distr::Alphanumeric, Rng};
use serde_json::json;
use validator::Validate;

use crate::database::AppState;
use crate::error::ApiError;
use crate::middleware::CurrentUser;
use crate::model::{InsertUser, LoginRequest, PublicUser, RegisterRequest, Session};
use crate::storage::Storage;

/// Name of the session cookie
pub const SESSION_COOKIE: &str = "stayease_session";

/// Sessions live for one day, matching the cookie's Max-Age
const SESSION_TTL_HOURS: i64 = 24;

/// Mints a random 32-character session token
fn generate_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

fn session_cookie(token: &str) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        SESSION_COOKIE,
        token,
        SESSION_TTL_HOURS * 3600
    )
}

fn clear_session_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    )
}

/// Creates a session for the user and returns the Set-Cookie value
async fn issue_session(storage: &Arc<dyn Storage>, user_id: &str) -> Result<String, ApiError> {
    let token = generate_token();
    storage
        .create_session(Session {
            token: token.clone(),
            user_id: user_id.to_string(),
            expires_at: Utc::now() + Duration::hours(SESSION_TTL_HOURS),
        })
        .await?;
    Ok(session_cookie(&token))
}

/// Creates a new account
///
/// Usernames are unique; a taken username is a 400 with
/// "Username already exists". On success the user is logged in immediately
/// and the public projection is returned with 201.
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()?;

    if state
        .storage
        .get_user_by_username(&payload.username)
        .await?
        .is_some()
    {
        return Err(ApiError::Validation("Username already exists".to_string()));
    }

    let hash = bcrypt::hash(&payload.password, bcrypt::DEFAULT_COST).map_err(|err| {
        tracing::error!(error = %err, "password hashing failed");
        ApiError::Internal
    })?;

    let user = state
        .storage
        .create_user(InsertUser {
            username: payload.username,
            password: hash,
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            is_admin: false,
        })
        .await?;

    let cookie = issue_session(&state.storage, &user.id).await?;
    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(PublicUser::from(user)),
    ))
}

/// Authenticates a user and establishes a session
///
/// Unknown usernames and wrong passwords get the same 401 so the response
/// does not reveal which usernames exist.
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let invalid = || ApiError::Unauthorized("Invalid username or password".to_string());

    let user = state
        .storage
        .get_user_by_username(&payload.username)
        .await?
        .ok_or_else(invalid)?;

    if !bcrypt::verify(&payload.password, &user.password).unwrap_or(false) {
        return Err(invalid());
    }

    let cookie = issue_session(&state.storage, &user.id).await?;
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(PublicUser::from(user)),
    ))
}

/// Destroys the caller's session and clears the cookie
pub async fn logout(
    State(state): State<AppState>,
    Extension(current): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiError> {
    state.storage.delete_session(&current.token).await?;
    Ok((
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(json!({ "message": "Logged out successfully" })),
    ))
}

/// Returns the current session's public user projection
pub async fn current_user(Extension(current): Extension<CurrentUser>) -> Json<PublicUser> {
    Json(PublicUser::from(current.user))
}
