//! Session-cookie authentication.
//!
//! Login is by username only (password verification is deliberately
//! disabled). A successful login writes a session row whose id is the
//! bearer token carried in the `zac_session` cookie; the middleware
//! resolves that token to a [`User`] and injects it as a request extension.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use db::models::{session::Session, user::User};
use uuid::Uuid;

use crate::{AppState, error::ApiError};

pub const SESSION_COOKIE: &str = "zac_session";

/// Resolve the session cookie to a user, rejecting the request when the
/// cookie is missing or stale.
pub async fn require_user_middleware(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = jar
        .get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok())
        .ok_or(ApiError::Unauthorized)?;

    let session = Session::find_by_id(&state.db().pool, token)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let user = User::find_by_id(&state.db().pool, session.user_id)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(session);
    Ok(next.run(request).await)
}
