use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use thiserror::Error;
use ts_rs::TS;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum UserError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error("User not found")]
    UserNotFound,
    #[error("Cannot delete the last admin or team leader")]
    LastAdmin,
    #[error("Users cannot delete their own account")]
    SelfDelete,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize, TS, EnumString, Display, Default,
)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum UserRole {
    Admin,
    TeamLeader,
    #[default]
    CaseManager,
    ShipmentCoordinator,
    DataAnalyst,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub nickname: Option<String>,
    pub mobile_number: Option<String>,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, TS)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub nickname: Option<String>,
    pub mobile_number: Option<String>,
    #[serde(default)]
    pub role: UserRole,
}

#[derive(Debug, Deserialize, TS)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub mobile_number: Option<String>,
    pub role: Option<UserRole>,
}

impl User {
    /// Admins and team leaders share the full permission set.
    pub fn is_admin(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::TeamLeader)
    }

    pub fn is_team_leader(&self) -> bool {
        self.is_admin()
    }

    /// Coordinators may manage schedules on top of their own data.
    pub fn is_coordinator(&self) -> bool {
        matches!(
            self.role,
            UserRole::Admin | UserRole::TeamLeader | UserRole::CaseManager
        )
    }

    /// Display name shown throughout the app: nickname when set, else username.
    pub fn display_name(&self) -> &str {
        self.nickname
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.username)
    }

    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, username, email, nickname, mobile_number, role, created_at
             FROM users ORDER BY username ASC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, username, email, nickname, mobile_number, role, created_at
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_username(
        pool: &SqlitePool,
        username: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, username, email, nickname, mobile_number, role, created_at
             FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(pool)
        .await
    }

    /// All users holding the admin or team-leader role, e.g. for leave
    /// request fan-out.
    pub async fn find_leaders(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, username, email, nickname, mobile_number, role, created_at
             FROM users WHERE role IN ('admin', 'team_leader') ORDER BY username ASC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn count_leaders(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM users WHERE role IN ('admin', 'team_leader')",
        )
        .fetch_one(pool)
        .await
    }

    pub async fn create(pool: &SqlitePool, data: &CreateUser) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(
            "INSERT INTO users (id, username, email, nickname, mobile_number, role)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id, username, email, nickname, mobile_number, role, created_at",
        )
        .bind(id)
        .bind(&data.username)
        .bind(&data.email)
        .bind(&data.nickname)
        .bind(&data.mobile_number)
        .bind(data.role)
        .fetch_one(pool)
        .await
    }

    pub async fn update(pool: &SqlitePool, id: Uuid, data: &UpdateUser) -> Result<Self, sqlx::Error> {
        let existing = Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        let username = data.username.as_ref().unwrap_or(&existing.username);
        let email = data.email.as_ref().unwrap_or(&existing.email);
        let nickname = data.nickname.as_ref().or(existing.nickname.as_ref());
        let mobile_number = data
            .mobile_number
            .as_ref()
            .or(existing.mobile_number.as_ref());
        let role = data.role.unwrap_or(existing.role);

        sqlx::query_as::<_, Self>(
            "UPDATE users
             SET username = $2, email = $3, nickname = $4, mobile_number = $5, role = $6
             WHERE id = $1
             RETURNING id, username, email, nickname, mobile_number, role, created_at",
        )
        .bind(id)
        .bind(username)
        .bind(email)
        .bind(nickname)
        .bind(mobile_number)
        .bind(role)
        .fetch_one(pool)
        .await
    }

    /// Delete a user without leaving orphaned rows.
    ///
    /// Rows that reference the user under NOT NULL constraints are removed;
    /// `created_by`-style columns are reassigned to `fallback_admin` so the
    /// records they own survive. Runs in a single transaction.
    pub async fn delete_with_reassignment(
        pool: &SqlitePool,
        id: Uuid,
        fallback_admin: Uuid,
    ) -> Result<(), sqlx::Error> {
        let mut tx = pool.begin().await?;

        for sql in [
            "DELETE FROM user_permissions WHERE user_id = $1 OR granted_by = $1",
            "DELETE FROM post_likes WHERE user_id = $1",
            "DELETE FROM post_hearts WHERE user_id = $1",
            "DELETE FROM post_reposts WHERE user_id = $1",
            "DELETE FROM post_comments WHERE user_id = $1",
            "DELETE FROM notifications WHERE user_id = $1 OR actor_id = $1",
            "DELETE FROM journal_entries WHERE user_id = $1",
            "DELETE FROM tasks WHERE user_id = $1",
            "DELETE FROM task_options WHERE user_id = $1",
            "DELETE FROM messages WHERE user_id = $1 OR recipient_id = $1",
            "DELETE FROM sessions WHERE user_id = $1",
            "DELETE FROM activity_log WHERE actor_id = $1",
            "UPDATE activity_log SET target_user_id = NULL WHERE target_user_id = $1",
            "DELETE FROM leave_requests WHERE user_id = $1",
            "UPDATE leave_requests SET reviewed_by = NULL WHERE reviewed_by = $1",
            "UPDATE practice_songs SET prepared_by = NULL WHERE prepared_by = $1",
        ] {
            sqlx::query(sql).bind(id).execute(&mut *tx).await?;
        }

        for sql in [
            "UPDATE sunday_services SET created_by = $2 WHERE created_by = $1",
            "UPDATE practices SET created_by = $2 WHERE created_by = $1",
            "UPDATE songs SET created_by = $2 WHERE created_by = $1",
            "UPDATE slides SET created_by = $2 WHERE created_by = $1",
            "UPDATE event_announcements SET created_by = $2 WHERE created_by = $1",
            "UPDATE tools SET created_by = $2 WHERE created_by = $1",
        ] {
            sqlx::query(sql)
                .bind(id)
                .bind(fallback_admin)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await
    }
}
