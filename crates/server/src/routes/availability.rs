use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use chrono::NaiveDate;
use db::models::{availability::MusicianAvailability, musician::Musician, user::User};
use serde::Deserialize;
use services::services::{calendar, calendar::AvailabilityCalendar, leave};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

/// Resolve the target user's musician profile, creating one on first access.
async fn musician_for_user(state: &AppState, user_id: Uuid) -> Result<Musician, ApiError> {
    let pool = &state.db().pool;
    let user = User::find_by_id(pool, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    let (musician, _) =
        Musician::find_or_create_for_user(pool, user.id, user.display_name()).await?;
    Ok(musician)
}

/// GET /api/users/{user_id}/availability - The merged calendar.
/// Pending leave is only visible to the calendar's owner.
pub async fn get_availability(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Path(user_id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<AvailabilityCalendar>>, ApiError> {
    let musician = musician_for_user(&state, user_id).await?;
    let is_own = user_id == current.id;
    let calendar = calendar::build_calendar(&state.db().pool, musician.id, is_own).await?;
    Ok(ResponseJson(ApiResponse::success(calendar)))
}

#[derive(Debug, Deserialize, TS)]
pub struct ToggleAvailability {
    pub date: NaiveDate,
    #[serde(default = "default_true")]
    pub is_available: bool,
    #[serde(default)]
    pub reason: String,
}

fn default_true() -> bool {
    true
}

/// POST /api/users/{user_id}/availability/toggle
///
/// Marking a date available writes the availability row directly; marking
/// it unavailable files a leave request (auto-approved for team leaders).
pub async fn toggle_availability(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<ToggleAvailability>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    if user_id != current.id {
        return Err(ApiError::Forbidden(
            "You can only file a leave for yourself".to_string(),
        ));
    }

    let musician = musician_for_user(&state, user_id).await?;
    let pool = &state.db().pool;

    if payload.is_available {
        MusicianAvailability::upsert(pool, musician.id, payload.date, true, None).await?;
        return Ok(ResponseJson(ApiResponse::success_with_message(
            (),
            "Availability updated",
        )));
    }

    let filed = leave::file_leave(pool, &current, musician.id, payload.date, &payload.reason).await?;
    let message = if filed.auto_approved {
        "Leave request approved automatically. It has been added to your schedule."
    } else {
        "Leave request submitted successfully. It will appear in your schedule once approved by your Team Leader."
    };
    Ok(ResponseJson(ApiResponse::success_with_message((), message)))
}

#[derive(Debug, Deserialize, TS)]
pub struct RemoveAvailability {
    pub date: NaiveDate,
}

/// POST /api/users/{user_id}/availability/remove
///
/// An approved leave on the date is cancelled (requester only); otherwise
/// the availability row is deleted. A missing row still reports success.
pub async fn remove_availability(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<RemoveAvailability>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    if !current.is_coordinator() && user_id != current.id {
        return Err(ApiError::Forbidden(
            "You can only remove your own availability".to_string(),
        ));
    }

    let pool = &state.db().pool;
    let musician = Musician::find_by_user_id(pool, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Team member profile not found".to_string()))?;

    match leave::cancel_approved(pool, &current, musician.id, payload.date).await {
        Ok(_) => Ok(ResponseJson(ApiResponse::success_with_message(
            (),
            "Leave request cancelled successfully. The approver has been notified.",
        ))),
        Err(leave::LeaveError::NotFound) => {
            MusicianAvailability::delete_for_date(pool, musician.id, payload.date).await?;
            Ok(ResponseJson(ApiResponse::success_with_message(
                (),
                "Availability removed",
            )))
        }
        Err(e) => Err(e.into()),
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users/{id}/availability", get(get_availability))
        .route("/users/{id}/availability/toggle", post(toggle_availability))
        .route("/users/{id}/availability/remove", post(remove_availability))
}
