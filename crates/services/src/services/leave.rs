//! Leave request workflow.
//!
//! Filing, review, and cancellation all keep three tables in step: the
//! request itself, the availability row for the date, and the notification
//! fan-out, plus an activity-feed entry for the dashboard.

use chrono::NaiveDate;
use db::models::{
    activity::{ActivityLog, ActivityType, RecordActivity},
    availability::MusicianAvailability,
    leave_request::{LeaveRequest, LeaveStatus},
    notification::{CreateNotification, Notification, NotificationType},
    user::User,
};
use serde_json::json;
use sqlx::SqlitePool;
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum LeaveError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("Leave request not found")]
    NotFound,
    #[error("This leave request has already been processed")]
    AlreadyProcessed,
    #[error("You already have a leave request for this date")]
    DuplicateDate,
    #[error("A reason is required for leave requests")]
    MissingReason,
    #[error("You can only cancel your own leave requests")]
    NotRequester,
    #[error("No pending leave requests to approve")]
    NothingPending,
}

/// Outcome of filing a leave: whether it was auto-approved on the spot.
#[derive(Debug)]
pub struct FiledLeave {
    pub request: LeaveRequest,
    pub auto_approved: bool,
}

/// File a leave request for a date. Team leaders are approved immediately
/// (with the availability row written); everyone else goes to the pending
/// queue and every leader is notified.
pub async fn file_leave(
    pool: &SqlitePool,
    requester: &User,
    musician_id: Uuid,
    date: NaiveDate,
    reason: &str,
) -> Result<FiledLeave, LeaveError> {
    let reason = reason.trim();
    if reason.is_empty() {
        return Err(LeaveError::MissingReason);
    }

    if LeaveRequest::find_active_for_date(pool, musician_id, date)
        .await?
        .is_some()
    {
        return Err(LeaveError::DuplicateDate);
    }

    let auto_approved = requester.is_team_leader();
    let (status, reviewer) = if auto_approved {
        (LeaveStatus::Approved, Some(requester.id))
    } else {
        (LeaveStatus::Pending, None)
    };

    let request =
        LeaveRequest::create(pool, requester.id, musician_id, date, reason, status, reviewer)
            .await?;

    if auto_approved {
        MusicianAvailability::upsert(pool, musician_id, date, false, Some(reason)).await?;
    } else {
        for leader in User::find_leaders(pool).await? {
            Notification::create(
                pool,
                &CreateNotification::new(leader.id, NotificationType::LeaveRequest, requester.id)
                    .leave_request(request.id),
            )
            .await?;
        }
    }

    let activity_type = if auto_approved {
        ActivityType::LeaveApproved
    } else {
        ActivityType::LeaveFiled
    };
    let verb = if auto_approved {
        "filed and auto-approved"
    } else {
        "filed"
    };
    log_leave_activity(
        pool,
        activity_type,
        requester.id,
        &request,
        format!(
            "{} {verb} a leave request for {}: {reason}",
            requester.display_name(),
            date.format("%B %d, %Y"),
        ),
    )
    .await;

    Ok(FiledLeave {
        request,
        auto_approved,
    })
}

/// Approve a pending request: reviewer fields, availability override,
/// requester notification, activity entry.
pub async fn approve(
    pool: &SqlitePool,
    reviewer: &User,
    request_id: Uuid,
) -> Result<LeaveRequest, LeaveError> {
    let request = LeaveRequest::find_by_id(pool, request_id)
        .await?
        .ok_or(LeaveError::NotFound)?;
    if request.status != LeaveStatus::Pending {
        return Err(LeaveError::AlreadyProcessed);
    }

    let approved = LeaveRequest::set_reviewed(
        pool,
        request.id,
        LeaveStatus::Approved,
        Some(reviewer.id),
        None,
    )
    .await?;

    MusicianAvailability::upsert(
        pool,
        approved.musician_id,
        approved.date,
        false,
        Some(&approved.reason),
    )
    .await?;

    Notification::create(
        pool,
        &CreateNotification::new(approved.user_id, NotificationType::LeaveApproved, reviewer.id)
            .leave_request(approved.id),
    )
    .await?;

    log_leave_activity(
        pool,
        ActivityType::LeaveApproved,
        reviewer.id,
        &approved,
        format!(
            "{} approved a leave request for {}: {}",
            reviewer.display_name(),
            approved.date.format("%B %d, %Y"),
            approved.reason,
        ),
    )
    .await;

    Ok(approved)
}

/// Reject a pending request with optional review notes.
pub async fn reject(
    pool: &SqlitePool,
    reviewer: &User,
    request_id: Uuid,
    review_notes: Option<&str>,
) -> Result<LeaveRequest, LeaveError> {
    let request = LeaveRequest::find_by_id(pool, request_id)
        .await?
        .ok_or(LeaveError::NotFound)?;
    if request.status != LeaveStatus::Pending {
        return Err(LeaveError::AlreadyProcessed);
    }

    let rejected = LeaveRequest::set_reviewed(
        pool,
        request.id,
        LeaveStatus::Rejected,
        Some(reviewer.id),
        review_notes,
    )
    .await?;

    Notification::create(
        pool,
        &CreateNotification::new(rejected.user_id, NotificationType::LeaveRejected, reviewer.id)
            .leave_request(rejected.id),
    )
    .await?;

    Ok(rejected)
}

/// Approve every pending request. Returns how many were approved.
pub async fn approve_all(pool: &SqlitePool, reviewer: &User) -> Result<usize, LeaveError> {
    let pending = LeaveRequest::find_all_pending(pool).await?;
    if pending.is_empty() {
        return Err(LeaveError::NothingPending);
    }

    let mut approved_count = 0;
    for request in pending {
        match approve(pool, reviewer, request.id).await {
            Ok(_) => approved_count += 1,
            // Keep going; a request processed concurrently is not fatal.
            Err(LeaveError::AlreadyProcessed) => {}
            Err(e) => {
                warn!(request_id = %request.id, error = %e, "Failed to approve leave request");
            }
        }
    }

    Ok(approved_count)
}

/// Cancel an approved leave for a date. Only the requester may cancel; the
/// availability override is removed and the approver is told.
pub async fn cancel_approved(
    pool: &SqlitePool,
    actor: &User,
    musician_id: Uuid,
    date: NaiveDate,
) -> Result<LeaveRequest, LeaveError> {
    let request = LeaveRequest::find_approved_for_date(pool, musician_id, date)
        .await?
        .ok_or(LeaveError::NotFound)?;

    if request.user_id != actor.id {
        return Err(LeaveError::NotRequester);
    }

    let cancelled =
        LeaveRequest::set_reviewed(pool, request.id, LeaveStatus::Cancelled, request.reviewed_by, None)
            .await?;

    MusicianAvailability::delete_for_date(pool, musician_id, date).await?;

    if let Some(approver) = request.reviewed_by {
        Notification::create(
            pool,
            &CreateNotification::new(approver, NotificationType::LeaveCancelled, actor.id)
                .leave_request(cancelled.id),
        )
        .await?;
    }

    log_leave_activity(
        pool,
        ActivityType::LeaveCancelled,
        actor.id,
        &cancelled,
        format!(
            "{} cancelled their approved leave request for {}: {}",
            actor.display_name(),
            cancelled.date.format("%B %d, %Y"),
            cancelled.reason,
        ),
    )
    .await;

    Ok(cancelled)
}

/// Activity logging must never fail the workflow it annotates.
async fn log_leave_activity(
    pool: &SqlitePool,
    activity_type: ActivityType,
    actor_id: Uuid,
    request: &LeaveRequest,
    description: String,
) {
    let mut record = RecordActivity::new(activity_type, actor_id, description);
    record.target_user_id = Some(request.user_id);
    record.leave_request_id = Some(request.id);
    record.extra_data = Some(json!({
        "date": request.date,
        "reason": request.reason,
    }));
    if let Err(e) = ActivityLog::record(pool, &record).await {
        warn!(error = %e, "Failed to record leave activity");
    }
}
