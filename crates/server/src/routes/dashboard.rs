use axum::{Extension, Router, extract::State, response::Json as ResponseJson, routing::get};
use chrono::Utc;
use db::models::{
    activity::{ActivityLog, ActivityType, RecordActivity},
    announcement::EventAnnouncement,
    leave_request::LeaveRequest,
    musician::Musician,
    practice::{Practice, PracticeMusician, PracticeSong},
    service::SundayService,
    user::User,
};
use serde::Serialize;
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError};

const NEW_MEMBER_WINDOW_DAYS: i64 = 30;
const ACTIVITY_WINDOW_DAYS: i64 = 30;
const ACTIVITY_LIMIT: i64 = 20;
const UPCOMING_SERVICES_LIMIT: i64 = 5;

#[derive(Debug, Serialize, TS)]
pub struct UserAssignmentInfo {
    pub instrument: String,
    pub date: chrono::NaiveDate,
}

#[derive(Debug, Serialize, TS)]
pub struct LatestPractice {
    pub practice: Practice,
    pub musicians: Vec<PracticeMusician>,
    pub songs: Vec<PracticeSong>,
}

#[derive(Debug, Serialize, TS)]
pub struct DashboardResponse {
    pub upcoming_services: Vec<SundayService>,
    pub latest_practice: Option<LatestPractice>,
    pub user_assignment: Option<UserAssignmentInfo>,
    pub new_members: Vec<Musician>,
    pub announcements: Vec<EventAnnouncement>,
    pub pending_leave_requests: Vec<LeaveRequest>,
    pub recent_activities: Vec<ActivityLog>,
}

/// GET /api/dashboard - Everything the landing page shows in one response
pub async fn get_dashboard(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
) -> Result<ResponseJson<ApiResponse<DashboardResponse>>, ApiError> {
    let pool = &state.db().pool;
    let today = Utc::now().date_naive();

    let upcoming_services =
        SundayService::find_upcoming(pool, today, UPCOMING_SERVICES_LIMIT).await?;

    // First visit provisions the member profile and announces them.
    let (musician, created) =
        Musician::find_or_create_for_user(pool, current.id, current.display_name()).await?;
    if created {
        let record = RecordActivity::new(
            ActivityType::NewMember,
            current.id,
            format!("{} joined the team as a new member", current.display_name()),
        );
        if let Err(e) = ActivityLog::record(pool, &record).await {
            tracing::warn!(error = %e, "Failed to record new member activity");
        }
    }

    let mut user_assignment = None;
    let latest_practice = match Practice::find_next(pool, today).await? {
        Some(practice) => {
            let musicians = PracticeMusician::find_for_practice(pool, practice.id).await?;
            let songs = PracticeSong::find_for_practice(pool, practice.id).await?;
            user_assignment = musicians
                .iter()
                .find(|a| a.musician_id == musician.id)
                .map(|a| UserAssignmentInfo {
                    instrument: a.instrument.clone(),
                    date: practice.date,
                });
            Some(LatestPractice {
                practice,
                musicians,
                songs,
            })
        }
        None => None,
    };

    // Dedupe by linked user so re-created profiles don't show twice.
    let mut new_members: Vec<Musician> = Vec::new();
    for candidate in Musician::find_recent_linked(pool, NEW_MEMBER_WINDOW_DAYS).await? {
        if !new_members.iter().any(|m| m.user_id == candidate.user_id) {
            new_members.push(candidate);
        }
    }

    let announcements = EventAnnouncement::find_active(pool).await?;

    let pending_leave_requests = if current.is_team_leader() {
        LeaveRequest::find_all_pending(pool).await?
    } else {
        Vec::new()
    };

    let recent_activities =
        ActivityLog::find_recent(pool, ACTIVITY_WINDOW_DAYS, ACTIVITY_LIMIT).await?;

    Ok(ResponseJson(ApiResponse::success(DashboardResponse {
        upcoming_services,
        latest_practice,
        user_assignment,
        new_members,
        announcements,
        pending_leave_requests,
        recent_activities,
    })))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(get_dashboard))
}
