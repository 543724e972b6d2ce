use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{leave_request::LeaveRequest, user::User};
use serde::{Deserialize, Serialize};
use services::services::leave;
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

fn require_leader(user: &User) -> Result<(), ApiError> {
    if user.is_team_leader() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Only Team Leaders can review leave requests".to_string(),
        ))
    }
}

#[derive(Debug, Serialize, TS)]
pub struct LeaveRequestList {
    pub requests: Vec<LeaveRequest>,
    pub is_team_leader: bool,
}

/// GET /api/leave-requests - Leaders see the pending queue; everyone else
/// sees their own history.
pub async fn get_leave_requests(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
) -> Result<ResponseJson<ApiResponse<LeaveRequestList>>, ApiError> {
    let pool = &state.db().pool;
    let (requests, is_team_leader) = if current.is_team_leader() {
        (LeaveRequest::find_all_pending(pool).await?, true)
    } else {
        (LeaveRequest::find_by_user(pool, current.id).await?, false)
    };
    Ok(ResponseJson(ApiResponse::success(LeaveRequestList {
        requests,
        is_team_leader,
    })))
}

/// POST /api/leave-requests/{id}/approve - Team Leaders only
pub async fn approve_leave_request(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<LeaveRequest>>, ApiError> {
    require_leader(&current)?;
    let approved = leave::approve(&state.db().pool, &current, id).await?;
    Ok(ResponseJson(ApiResponse::success_with_message(
        approved,
        "Leave request approved successfully.",
    )))
}

#[derive(Debug, Default, Deserialize, TS)]
pub struct RejectLeaveRequest {
    pub review_notes: Option<String>,
}

/// POST /api/leave-requests/{id}/reject - Team Leaders only
pub async fn reject_leave_request(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Path(id): Path<Uuid>,
    payload: Option<Json<RejectLeaveRequest>>,
) -> Result<ResponseJson<ApiResponse<LeaveRequest>>, ApiError> {
    require_leader(&current)?;
    let review_notes = payload.and_then(|Json(p)| p.review_notes);
    let rejected =
        leave::reject(&state.db().pool, &current, id, review_notes.as_deref()).await?;
    Ok(ResponseJson(ApiResponse::success_with_message(
        rejected,
        "Leave request rejected.",
    )))
}

#[derive(Debug, Serialize, TS)]
pub struct ApproveAllResponse {
    pub count: usize,
}

/// POST /api/leave-requests/approve-all - Team Leaders only
pub async fn approve_all_leave_requests(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
) -> Result<ResponseJson<ApiResponse<ApproveAllResponse>>, ApiError> {
    require_leader(&current)?;
    let count = leave::approve_all(&state.db().pool, &current).await?;
    Ok(ResponseJson(ApiResponse::success_with_message(
        ApproveAllResponse { count },
        format!("Successfully approved {count} leave request(s)."),
    )))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/leave-requests", get(get_leave_requests))
        .route("/leave-requests/approve-all", post(approve_all_leave_requests))
        .route("/leave-requests/{id}/approve", post(approve_leave_request))
        .route("/leave-requests/{id}/reject", post(reject_leave_request))
}
