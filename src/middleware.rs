use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::SESSION_COOKIE;
use crate::database::AppState;
use crate::error::ApiError;
use crate::model::User;

/// The authenticated caller, injected into request extensions by
/// [`auth_middleware`]
///
/// Carries the session token alongside the user so the logout handler can
/// revoke the exact session that authenticated the request.
#[derive(Clone)]
pub struct CurrentUser {
    pub user: User,
    pub token: String,
}

/// Extracts the session token from the `Cookie` header
fn session_token(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::COOKIE)?.to_str().ok()?;
    raw.split(';').map(str::trim).find_map(|pair| {
        pair.strip_prefix(SESSION_COOKIE)?
            .strip_prefix('=')
            .map(str::to_string)
    })
}

/// Middleware requiring a valid session
///
/// Resolves the session cookie through the storage port and injects the
/// current user into request extensions. Requests without a valid,
/// unexpired session are rejected with 401 before reaching the handler.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let unauthorized = || ApiError::Unauthorized("Unauthorized".to_string());

    let token = session_token(request.headers()).ok_or_else(unauthorized)?;
    let session = state
        .storage
        .get_session(&token)
        .await?
        .ok_or_else(unauthorized)?;
    let user = state
        .storage
        .get_user(&session.user_id)
        .await?
        .ok_or_else(unauthorized)?;

    request.extensions_mut().insert(CurrentUser { user, token });
    Ok(next.run(request).await)
}

/// Middleware requiring admin status, layered inside [`auth_middleware`]
pub async fn admin_middleware(request: Request, next: Next) -> Result<Response, ApiError> {
    let current = request
        .extensions()
        .get::<CurrentUser>()
        .ok_or_else(|| ApiError::Unauthorized("Unauthorized".to_string()))?;

    if !current.user.is_admin {
        return Err(ApiError::Forbidden(
            "Forbidden: Admin access required".to_string(),
        ));
    }

    Ok(next.run(request).await)
}
