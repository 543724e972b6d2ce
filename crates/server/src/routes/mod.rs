use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{IntoMakeService, get},
};

use crate::AppState;

pub mod announcements;
pub mod auth;
pub mod availability;
pub mod chat;
pub mod dashboard;
pub mod files;
pub mod frontend;
pub mod health;
pub mod journal;
pub mod leave_requests;
pub mod musicians;
pub mod notifications;
pub mod posts;
pub mod practices;
pub mod services;
pub mod slides;
pub mod songs;
pub mod tasks;
pub mod tools;
pub mod users;

pub fn router(state: AppState) -> IntoMakeService<Router> {
    // Everything behind the session cookie.
    let protected = Router::new()
        .merge(auth::session_router())
        .merge(dashboard::router())
        .merge(users::router())
        .merge(musicians::router(&state))
        .merge(posts::router(&state))
        .merge(availability::router())
        .merge(leave_requests::router())
        .merge(services::router(&state))
        .merge(practices::router(&state))
        .merge(songs::router(&state))
        .merge(slides::router(&state))
        .merge(announcements::router(&state))
        .merge(notifications::router())
        .merge(tasks::router())
        .merge(tools::router(&state))
        .merge(journal::router())
        .merge(chat::router())
        .layer(from_fn_with_state(
            state.clone(),
            crate::auth::require_user_middleware,
        ));

    let api = Router::new()
        .route("/health", get(health::health_check))
        .merge(auth::login_router())
        .merge(protected)
        .layer(tower_http::cors::CorsLayer::permissive())
        .with_state(state);

    Router::new()
        .route("/", get(frontend::serve_frontend_root))
        .route("/uploads/{*path}", get(files::serve_upload))
        .route("/{*path}", get(frontend::serve_frontend))
        .nest("/api", api)
        .into_make_service()
}
