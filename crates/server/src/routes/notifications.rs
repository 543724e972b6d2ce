use axum::{
    Extension, Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{notification::Notification, user::User};
use serde::Serialize;
use services::services::notifier::{self, NotificationFeed};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// GET /api/notifications - Latest 20 for the current user, rendered
pub async fn get_notifications(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
) -> Result<ResponseJson<ApiResponse<NotificationFeed>>, ApiError> {
    let feed = notifier::feed_for_user(&state.db().pool, current.id, 20).await?;
    Ok(ResponseJson(ApiResponse::success(feed)))
}

/// POST /api/notifications/{id}/read - Mark one as read (owner only)
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &state.db().pool;
    let notification = Notification::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Notification not found".to_string()))?;
    if notification.user_id != current.id {
        return Err(ApiError::Forbidden(
            "You can only manage your own notifications".to_string(),
        ));
    }
    Notification::mark_read(pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

/// POST /api/notifications/read-all
pub async fn mark_all_notifications_read(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    Notification::mark_all_read(&state.db().pool, current.id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

#[derive(Debug, Serialize, TS)]
pub struct DeletedCount {
    pub count: u64,
}

/// POST /api/notifications/delete-all - Clear the current user's inbox
pub async fn delete_all_notifications(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
) -> Result<ResponseJson<ApiResponse<DeletedCount>>, ApiError> {
    let count = Notification::delete_all_for_user(&state.db().pool, current.id).await?;
    Ok(ResponseJson(ApiResponse::success_with_message(
        DeletedCount { count },
        format!("Successfully deleted {count} notification(s)."),
    )))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/notifications", get(get_notifications))
        .route("/notifications/read-all", post(mark_all_notifications_read))
        .route("/notifications/delete-all", post(delete_all_notifications))
        .route("/notifications/{id}/read", post(mark_notification_read))
}
