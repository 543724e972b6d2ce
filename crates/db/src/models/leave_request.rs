use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize, TS, EnumString, Display, Default,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum LeaveStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

/// A dated request to be marked unavailable, subject to team-leader review.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct LeaveRequest {
    pub id: Uuid,
    pub user_id: Uuid,
    pub musician_id: Uuid,
    pub date: NaiveDate,
    pub reason: String,
    pub status: LeaveStatus,
    pub requested_at: DateTime<Utc>,
    pub reviewed_by: Option<Uuid>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub review_notes: Option<String>,
}

const ALL_COLUMNS: &str = "id, user_id, musician_id, date, reason, status, requested_at, \
     reviewed_by, reviewed_at, review_notes";

impl LeaveRequest {
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {ALL_COLUMNS} FROM leave_requests WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_musician_and_status(
        pool: &SqlitePool,
        musician_id: Uuid,
        status: LeaveStatus,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {ALL_COLUMNS} FROM leave_requests
             WHERE musician_id = $1 AND status = $2 ORDER BY date ASC"
        ))
        .bind(musician_id)
        .bind(status)
        .fetch_all(pool)
        .await
    }

    /// All pending requests, oldest date first. Team-leader review queue.
    pub async fn find_all_pending(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {ALL_COLUMNS} FROM leave_requests
             WHERE status = 'pending' ORDER BY date ASC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_user(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {ALL_COLUMNS} FROM leave_requests
             WHERE user_id = $1 ORDER BY date DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// A pending or approved request for the date, if any. Used to reject
    /// duplicate filings.
    pub async fn find_active_for_date(
        pool: &SqlitePool,
        musician_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {ALL_COLUMNS} FROM leave_requests
             WHERE musician_id = $1 AND date = $2 AND status IN ('pending', 'approved')
             LIMIT 1"
        ))
        .bind(musician_id)
        .bind(date)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_approved_for_date(
        pool: &SqlitePool,
        musician_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {ALL_COLUMNS} FROM leave_requests
             WHERE musician_id = $1 AND date = $2 AND status = 'approved' LIMIT 1"
        ))
        .bind(musician_id)
        .bind(date)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        user_id: Uuid,
        musician_id: Uuid,
        date: NaiveDate,
        reason: &str,
        status: LeaveStatus,
        reviewed_by: Option<Uuid>,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        let reviewed_at = reviewed_by.map(|_| Utc::now());
        sqlx::query_as::<_, Self>(&format!(
            "INSERT INTO leave_requests (id, user_id, musician_id, date, reason, status, reviewed_by, reviewed_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {ALL_COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .bind(musician_id)
        .bind(date)
        .bind(reason)
        .bind(status)
        .bind(reviewed_by)
        .bind(reviewed_at)
        .fetch_one(pool)
        .await
    }

    /// Move a request to a reviewed state, recording the reviewer.
    pub async fn set_reviewed(
        pool: &SqlitePool,
        id: Uuid,
        status: LeaveStatus,
        reviewed_by: Option<Uuid>,
        review_notes: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "UPDATE leave_requests
             SET status = $2, reviewed_by = $3, reviewed_at = datetime('now', 'subsec'),
                 review_notes = COALESCE($4, review_notes)
             WHERE id = $1
             RETURNING {ALL_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .bind(reviewed_by)
        .bind(review_notes)
        .fetch_one(pool)
        .await
    }
}
