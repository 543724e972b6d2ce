use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{
    journal::{CreateJournal, Journal, UpdateJournal},
    user::User,
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// GET /api/journal - The current user's entries, newest first
pub async fn get_journal(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
) -> Result<ResponseJson<ApiResponse<Vec<Journal>>>, ApiError> {
    let entries = Journal::find_for_user(&state.db().pool, current.id).await?;
    Ok(ResponseJson(ApiResponse::success(entries)))
}

/// POST /api/journal - Add an entry
pub async fn create_journal(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Json(payload): Json<CreateJournal>,
) -> Result<ResponseJson<ApiResponse<Journal>>, ApiError> {
    let entry = Journal::create(&state.db().pool, current.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(entry)))
}

async fn owned_entry(state: &AppState, id: Uuid, user: &User) -> Result<Journal, ApiError> {
    let entry = Journal::find_by_id(&state.db().pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Journal entry not found".to_string()))?;
    if entry.user_id != user.id {
        return Err(ApiError::Forbidden(
            "You can only manage your own journal".to_string(),
        ));
    }
    Ok(entry)
}

/// PUT /api/journal/{id} - Edit an entry (owner only)
pub async fn update_journal(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateJournal>,
) -> Result<ResponseJson<ApiResponse<Journal>>, ApiError> {
    let entry = owned_entry(&state, id, &current).await?;
    let updated = Journal::update(&state.db().pool, entry.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

/// DELETE /api/journal/{id} - Remove an entry (owner only)
pub async fn delete_journal(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let entry = owned_entry(&state, id, &current).await?;
    if let Some(path) = &entry.image_path {
        crate::uploads::remove_stored(path).await;
    }
    Journal::delete(&state.db().pool, entry.id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/journal", get(get_journal).post(create_journal))
        .route(
            "/journal/{id}",
            axum::routing::put(update_journal).delete(delete_journal),
        )
}
