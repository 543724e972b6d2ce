use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize, TS, EnumString, Display,
)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ActivityType {
    LeaveFiled,
    LeaveApproved,
    LeaveCancelled,
    JobAidUploaded,
    NewMember,
}

/// An entry in the team activity feed shown on the dashboard.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct ActivityLog {
    pub id: Uuid,
    pub activity_type: ActivityType,
    pub actor_id: Uuid,
    pub target_user_id: Option<Uuid>,
    pub description: String,
    /// JSON blob with event-specific details (dates, file names).
    pub extra_data: Option<String>,
    pub slide_id: Option<Uuid>,
    pub leave_request_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct RecordActivity {
    pub activity_type: ActivityType,
    pub actor_id: Uuid,
    pub target_user_id: Option<Uuid>,
    pub description: String,
    pub extra_data: Option<serde_json::Value>,
    pub slide_id: Option<Uuid>,
    pub leave_request_id: Option<Uuid>,
}

impl RecordActivity {
    pub fn new(activity_type: ActivityType, actor_id: Uuid, description: impl Into<String>) -> Self {
        Self {
            activity_type,
            actor_id,
            target_user_id: None,
            description: description.into(),
            extra_data: None,
            slide_id: None,
            leave_request_id: None,
        }
    }
}

impl ActivityLog {
    pub async fn record(pool: &SqlitePool, data: &RecordActivity) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        let extra = data.extra_data.as_ref().map(|v| v.to_string());
        sqlx::query_as::<_, Self>(
            "INSERT INTO activity_log (id, activity_type, actor_id, target_user_id, description,
                                       extra_data, slide_id, leave_request_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id, activity_type, actor_id, target_user_id, description, extra_data,
                       slide_id, leave_request_id, created_at",
        )
        .bind(id)
        .bind(data.activity_type)
        .bind(data.actor_id)
        .bind(data.target_user_id)
        .bind(&data.description)
        .bind(extra)
        .bind(data.slide_id)
        .bind(data.leave_request_id)
        .fetch_one(pool)
        .await
    }

    /// Entries from the last `days` days, newest first.
    pub async fn find_recent(
        pool: &SqlitePool,
        days: i64,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, activity_type, actor_id, target_user_id, description, extra_data,
                    slide_id, leave_request_id, created_at
             FROM activity_log
             WHERE created_at >= datetime('now', '-' || $1 || ' days')
             ORDER BY created_at DESC LIMIT $2",
        )
        .bind(days)
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
