use axum::{
    Extension, Json, Router,
    extract::{Multipart, State},
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{
    announcement::{CreateAnnouncement, EventAnnouncement, UpdateAnnouncement},
    user::User,
};
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError, middleware::load_announcement_middleware, uploads};

fn require_coordinator(user: &User) -> Result<(), ApiError> {
    if user.is_coordinator() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You don't have permission to manage announcements".to_string(),
        ))
    }
}

/// GET /api/announcements - All announcements for the management view
pub async fn get_announcements(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<EventAnnouncement>>>, ApiError> {
    let announcements = EventAnnouncement::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(announcements)))
}

/// POST /api/announcements - Create one. Multipart: `metadata` JSON part
/// plus an optional `image` part.
pub async fn create_announcement(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    mut multipart: Multipart,
) -> Result<ResponseJson<ApiResponse<EventAnnouncement>>, ApiError> {
    require_coordinator(&current)?;

    let mut metadata: Option<CreateAnnouncement> = None;
    let mut image_path: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("metadata") => {
                let raw = field.text().await?;
                metadata = Some(
                    serde_json::from_str(&raw)
                        .map_err(|e| ApiError::BadRequest(format!("Invalid metadata: {e}")))?,
                );
            }
            Some("image") => {
                image_path = Some(uploads::save_field(field, "announcements").await?);
            }
            _ => continue,
        }
    }

    let metadata = metadata
        .ok_or_else(|| ApiError::BadRequest("Announcement metadata is required".to_string()))?;
    let announcement = EventAnnouncement::create(
        &state.db().pool,
        &metadata,
        image_path.as_deref(),
        current.id,
    )
    .await?;
    Ok(ResponseJson(ApiResponse::success(announcement)))
}

/// PUT /api/announcements/{id}
pub async fn update_announcement(
    Extension(announcement): Extension<EventAnnouncement>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateAnnouncement>,
) -> Result<ResponseJson<ApiResponse<EventAnnouncement>>, ApiError> {
    require_coordinator(&current)?;
    let updated =
        EventAnnouncement::update(&state.db().pool, announcement.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

/// POST /api/announcements/{id}/toggle - Show or hide on the dashboard
pub async fn toggle_announcement(
    Extension(announcement): Extension<EventAnnouncement>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<bool>>, ApiError> {
    require_coordinator(&current)?;
    let is_active = EventAnnouncement::toggle_active(&state.db().pool, announcement.id).await?;
    Ok(ResponseJson(ApiResponse::success(is_active)))
}

/// DELETE /api/announcements/{id}
pub async fn delete_announcement(
    Extension(announcement): Extension<EventAnnouncement>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    require_coordinator(&current)?;
    if let Some(path) = &announcement.image_path {
        uploads::remove_stored(path).await;
    }
    EventAnnouncement::delete(&state.db().pool, announcement.id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let announcement_router = Router::new()
        .route(
            "/",
            axum::routing::put(update_announcement).delete(delete_announcement),
        )
        .route("/toggle", post(toggle_announcement))
        .layer(from_fn_with_state(
            state.clone(),
            load_announcement_middleware,
        ));

    let inner = Router::new()
        .route("/", get(get_announcements).post(create_announcement))
        .nest("/{announcement_id}", announcement_router);

    Router::new().nest("/announcements", inner)
}
