//! Notification presentation.
//!
//! Rows in `notifications` only carry ids; this module renders them into the
//! display strings and link targets the bell dropdown shows, including the
//! relative "time ago" label.

use chrono::{DateTime, Utc};
use db::models::{
    leave_request::LeaveRequest,
    notification::{Notification, NotificationType},
    post::ProfilePost,
    user::User,
};
use serde::Serialize;
use sqlx::SqlitePool;
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Serialize, TS)]
pub struct RenderedNotification {
    pub id: Uuid,
    pub text: String,
    pub link: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub time_ago: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub leave_request_id: Option<Uuid>,
}

#[derive(Debug, Serialize, TS)]
pub struct NotificationFeed {
    pub notifications: Vec<RenderedNotification>,
    pub unread_count: i64,
}

/// Latest notifications for a user, rendered for display.
pub async fn feed_for_user(
    pool: &SqlitePool,
    user_id: Uuid,
    limit: i64,
) -> Result<NotificationFeed, sqlx::Error> {
    let rows = Notification::find_recent_for_user(pool, user_id, limit).await?;
    let now = Utc::now();

    let mut notifications = Vec::with_capacity(rows.len());
    for row in rows {
        let actor_name = match User::find_by_id(pool, row.actor_id).await? {
            Some(actor) => actor.display_name().to_string(),
            None => "Someone".to_string(),
        };
        let (text, link) = render(pool, &row, &actor_name).await?;
        notifications.push(RenderedNotification {
            id: row.id,
            text,
            link,
            is_read: row.is_read,
            created_at: row.created_at,
            time_ago: time_ago(row.created_at, now),
            notification_type: row.notification_type,
            leave_request_id: row.leave_request_id,
        });
    }

    let unread_count = Notification::unread_count(pool, user_id).await?;
    Ok(NotificationFeed {
        notifications,
        unread_count,
    })
}

async fn render(
    pool: &SqlitePool,
    row: &Notification,
    actor_name: &str,
) -> Result<(String, String), sqlx::Error> {
    let post_link = match row.post_id {
        Some(post_id) => ProfilePost::find_by_id(pool, post_id)
            .await?
            .map(|p| format!("/musicians/{}/profile", p.musician_id)),
        None => None,
    };

    let (text, link) = match row.notification_type {
        NotificationType::Like => (format!("{actor_name} liked your post"), post_link),
        NotificationType::Heart => (format!("{actor_name} ❤️ your post"), post_link),
        NotificationType::Share => (format!("{actor_name} shared your post"), post_link),
        NotificationType::Comment => (format!("{actor_name} commented on your post"), post_link),
        NotificationType::Practice => (
            format!("{actor_name} created a new practice schedule"),
            row.practice_id.map(|id| format!("/practices/{id}")),
        ),
        NotificationType::LeaveRequest => (
            format!("{actor_name} filed a leave request for your approval"),
            None,
        ),
        NotificationType::LeaveApproved => (
            format!("Your leave request has been approved by {actor_name}"),
            Some("/leave-requests".to_string()),
        ),
        NotificationType::LeaveRejected => {
            let notes = match row.leave_request_id {
                Some(id) => LeaveRequest::find_by_id(pool, id)
                    .await?
                    .and_then(|r| r.review_notes),
                None => None,
            };
            let text = match notes {
                Some(notes) => format!(
                    "Your leave request has been rejected by {actor_name}. Reason: {notes}"
                ),
                None => format!("Your leave request has been rejected by {actor_name}"),
            };
            (text, Some("/leave-requests".to_string()))
        }
        NotificationType::LeaveCancelled => (
            format!("{actor_name} cancelled their approved leave request"),
            Some("/leave-requests".to_string()),
        ),
    };

    Ok((text, link.unwrap_or_else(|| "#".to_string())))
}

/// Coarse relative timestamp: days, then hours, then minutes.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = now.signed_duration_since(then);
    let days = diff.num_days();
    if days > 0 {
        return format!("{days} day{} ago", if days > 1 { "s" } else { "" });
    }
    let hours = diff.num_hours();
    if hours > 0 {
        return format!("{hours} hour{} ago", if hours > 1 { "s" } else { "" });
    }
    let minutes = diff.num_minutes();
    if minutes > 0 {
        return format!("{minutes} minute{} ago", if minutes > 1 { "s" } else { "" });
    }
    "Just now".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn time_ago_buckets() {
        let now = Utc::now();
        assert_eq!(time_ago(now, now), "Just now");
        assert_eq!(time_ago(now - Duration::minutes(1), now), "1 minute ago");
        assert_eq!(time_ago(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(time_ago(now - Duration::hours(1), now), "1 hour ago");
        assert_eq!(time_ago(now - Duration::hours(23), now), "23 hours ago");
        assert_eq!(time_ago(now - Duration::days(1), now), "1 day ago");
        assert_eq!(time_ago(now - Duration::days(14), now), "14 days ago");
    }
}
