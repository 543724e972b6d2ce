use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// A dashboard event announcement.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct EventAnnouncement {
    pub id: Uuid,
    pub title: String,
    pub caption: Option<String>,
    pub image_path: Option<String>,
    pub is_active: bool,
    pub display_order: i64,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, TS)]
pub struct CreateAnnouncement {
    pub title: String,
    pub caption: Option<String>,
    #[serde(default)]
    pub display_order: i64,
}

#[derive(Debug, Deserialize, TS)]
pub struct UpdateAnnouncement {
    pub title: Option<String>,
    pub caption: Option<String>,
    pub display_order: Option<i64>,
}

const ALL_COLUMNS: &str = "id, title, caption, image_path, is_active, display_order, created_by, \
     created_at, updated_at";

impl EventAnnouncement {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {ALL_COLUMNS} FROM event_announcements
             ORDER BY display_order ASC, created_at DESC"
        ))
        .fetch_all(pool)
        .await
    }

    /// Active announcements in display order for the dashboard.
    pub async fn find_active(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {ALL_COLUMNS} FROM event_announcements
             WHERE is_active = 1 ORDER BY display_order ASC, created_at DESC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {ALL_COLUMNS} FROM event_announcements WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateAnnouncement,
        image_path: Option<&str>,
        created_by: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(&format!(
            "INSERT INTO event_announcements (id, title, caption, image_path, display_order, created_by)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ALL_COLUMNS}"
        ))
        .bind(id)
        .bind(&data.title)
        .bind(&data.caption)
        .bind(image_path)
        .bind(data.display_order)
        .bind(created_by)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateAnnouncement,
    ) -> Result<Self, sqlx::Error> {
        let existing = Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        sqlx::query_as::<_, Self>(&format!(
            "UPDATE event_announcements
             SET title = $2, caption = $3, display_order = $4, updated_at = datetime('now', 'subsec')
             WHERE id = $1
             RETURNING {ALL_COLUMNS}"
        ))
        .bind(id)
        .bind(data.title.as_ref().unwrap_or(&existing.title))
        .bind(data.caption.as_ref().or(existing.caption.as_ref()))
        .bind(data.display_order.unwrap_or(existing.display_order))
        .fetch_one(pool)
        .await
    }

    /// Flip visibility on the dashboard. Returns the new state.
    pub async fn toggle_active(pool: &SqlitePool, id: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            "UPDATE event_announcements
             SET is_active = NOT is_active, updated_at = datetime('now', 'subsec')
             WHERE id = $1
             RETURNING is_active",
        )
        .bind(id)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM event_announcements WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
