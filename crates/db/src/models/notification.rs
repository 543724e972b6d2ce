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
pub enum NotificationType {
    Like,
    Heart,
    Share,
    Comment,
    Practice,
    LeaveRequest,
    LeaveApproved,
    LeaveRejected,
    LeaveCancelled,
}

/// An in-app notification. At most one of the reference columns is set,
/// matching the notification type.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub notification_type: NotificationType,
    pub actor_id: Uuid,
    pub post_id: Option<Uuid>,
    pub practice_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub leave_request_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

/// Builder-ish payload for inserting a notification.
#[derive(Debug, Clone)]
pub struct CreateNotification {
    pub user_id: Uuid,
    pub notification_type: NotificationType,
    pub actor_id: Uuid,
    pub post_id: Option<Uuid>,
    pub practice_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub leave_request_id: Option<Uuid>,
}

impl CreateNotification {
    pub fn new(user_id: Uuid, notification_type: NotificationType, actor_id: Uuid) -> Self {
        Self {
            user_id,
            notification_type,
            actor_id,
            post_id: None,
            practice_id: None,
            comment_id: None,
            leave_request_id: None,
        }
    }

    pub fn post(mut self, post_id: Uuid) -> Self {
        self.post_id = Some(post_id);
        self
    }

    pub fn practice(mut self, practice_id: Uuid) -> Self {
        self.practice_id = Some(practice_id);
        self
    }

    pub fn comment(mut self, comment_id: Uuid) -> Self {
        self.comment_id = Some(comment_id);
        self
    }

    pub fn leave_request(mut self, leave_request_id: Uuid) -> Self {
        self.leave_request_id = Some(leave_request_id);
        self
    }
}

const ALL_COLUMNS: &str = "id, user_id, notification_type, actor_id, post_id, practice_id, \
     comment_id, leave_request_id, is_read, created_at";

impl Notification {
    pub async fn create(pool: &SqlitePool, data: &CreateNotification) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(&format!(
            "INSERT INTO notifications (id, user_id, notification_type, actor_id, post_id,
                                        practice_id, comment_id, leave_request_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING {ALL_COLUMNS}"
        ))
        .bind(id)
        .bind(data.user_id)
        .bind(data.notification_type)
        .bind(data.actor_id)
        .bind(data.post_id)
        .bind(data.practice_id)
        .bind(data.comment_id)
        .bind(data.leave_request_id)
        .fetch_one(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {ALL_COLUMNS} FROM notifications WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_recent_for_user(
        pool: &SqlitePool,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {ALL_COLUMNS} FROM notifications
             WHERE user_id = $1 ORDER BY created_at DESC LIMIT $2"
        ))
        .bind(user_id)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn unread_count(pool: &SqlitePool, user_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = 0",
        )
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    pub async fn mark_read(pool: &SqlitePool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE notifications SET is_read = 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn mark_all_read(pool: &SqlitePool, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("UPDATE notifications SET is_read = 1 WHERE user_id = $1 AND is_read = 0")
                .bind(user_id)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_all_for_user(pool: &SqlitePool, user_id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notifications WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
