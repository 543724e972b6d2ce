use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// A work tool: a link with a description and optional screenshot.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Tool {
    pub id: Uuid,
    pub name: String,
    pub link: String,
    pub description: Option<String>,
    pub screenshot: Option<String>,
    pub developer_name: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, TS)]
pub struct CreateTool {
    pub name: String,
    pub link: String,
    pub description: Option<String>,
    pub developer_name: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
pub struct UpdateTool {
    pub name: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub developer_name: Option<String>,
}

const ALL_COLUMNS: &str =
    "id, name, link, description, screenshot, developer_name, created_by, created_at, updated_at";

impl Tool {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!("SELECT {ALL_COLUMNS} FROM tools ORDER BY name ASC"))
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!("SELECT {ALL_COLUMNS} FROM tools WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateTool,
        screenshot: Option<&str>,
        created_by: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(&format!(
            "INSERT INTO tools (id, name, link, description, screenshot, developer_name, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {ALL_COLUMNS}"
        ))
        .bind(id)
        .bind(&data.name)
        .bind(&data.link)
        .bind(&data.description)
        .bind(screenshot)
        .bind(&data.developer_name)
        .bind(created_by)
        .fetch_one(pool)
        .await
    }

    pub async fn update(pool: &SqlitePool, id: Uuid, data: &UpdateTool) -> Result<Self, sqlx::Error> {
        let existing = Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        sqlx::query_as::<_, Self>(&format!(
            "UPDATE tools
             SET name = $2, link = $3, description = $4, developer_name = $5,
                 updated_at = datetime('now', 'subsec')
             WHERE id = $1
             RETURNING {ALL_COLUMNS}"
        ))
        .bind(id)
        .bind(data.name.as_ref().unwrap_or(&existing.name))
        .bind(data.link.as_ref().unwrap_or(&existing.link))
        .bind(data.description.as_ref().or(existing.description.as_ref()))
        .bind(data.developer_name.as_ref().or(existing.developer_name.as_ref()))
        .fetch_one(pool)
        .await
    }

    pub async fn set_screenshot(
        pool: &SqlitePool,
        id: Uuid,
        path: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "UPDATE tools SET screenshot = $2, updated_at = datetime('now', 'subsec') WHERE id = $1",
        )
        .bind(id)
        .bind(path)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tools WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
