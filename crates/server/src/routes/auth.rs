use axum::{
    Extension, Json, Router,
    extract::State,
    response::Json as ResponseJson,
    routing::{get, post},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use db::models::{session::Session, user::User};
use serde::Deserialize;
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{AppState, auth::SESSION_COOKIE, error::ApiError};

#[derive(Debug, Deserialize, TS)]
pub struct LoginRequest {
    pub username: String,
}

/// POST /api/auth/login - Start a session by username.
/// Password verification is deliberately disabled.
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(payload): Json<LoginRequest>,
) -> Result<(CookieJar, ResponseJson<ApiResponse<User>>), ApiError> {
    let username = payload.username.trim();
    if username.is_empty() {
        return Err(ApiError::BadRequest("Username is required".to_string()));
    }

    let user = User::find_by_username(&state.db().pool, username)
        .await?
        .ok_or(ApiError::Unauthorized)?;

    let session = Session::create(&state.db().pool, user.id).await?;

    let cookie = Cookie::build((SESSION_COOKIE, session.id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();

    Ok((jar.add(cookie), ResponseJson(ApiResponse::success(user))))
}

/// POST /api/auth/logout - End the current session.
pub async fn logout(
    State(state): State<AppState>,
    Extension(session): Extension<Session>,
    jar: CookieJar,
) -> Result<(CookieJar, ResponseJson<ApiResponse<()>>), ApiError> {
    Session::delete(&state.db().pool, session.id).await?;
    Ok((
        jar.remove(Cookie::from(SESSION_COOKIE)),
        ResponseJson(ApiResponse::success(())),
    ))
}

/// GET /api/auth/me - The logged-in user.
pub async fn me(Extension(user): Extension<User>) -> ResponseJson<ApiResponse<User>> {
    ResponseJson(ApiResponse::success(user))
}

/// Routes reachable without a session.
pub fn login_router() -> Router<AppState> {
    Router::new().route("/auth/login", post(login))
}

/// Routes that require a session.
pub fn session_router() -> Router<AppState> {
    Router::new()
        .route("/auth/logout", post(logout))
        .route("/auth/me", get(me))
}
