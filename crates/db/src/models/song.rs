use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// A song in the library, optionally with a chord chart image on disk.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Song {
    pub id: Uuid,
    pub title: String,
    pub artist: Option<String>,
    pub key: Option<String>,
    pub gender_key: Option<String>,
    pub file_path: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, TS)]
pub struct CreateSong {
    pub title: String,
    pub artist: Option<String>,
    pub key: Option<String>,
    pub gender_key: Option<String>,
    pub file_path: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
pub struct UpdateSong {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub key: Option<String>,
    pub gender_key: Option<String>,
    pub file_path: Option<String>,
}

impl Song {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, title, artist, key, gender_key, file_path, created_by, created_at
             FROM songs ORDER BY title ASC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, title, artist, key, gender_key, file_path, created_by, created_at
             FROM songs WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateSong,
        created_by: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(
            "INSERT INTO songs (id, title, artist, key, gender_key, file_path, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, title, artist, key, gender_key, file_path, created_by, created_at",
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.artist)
        .bind(&data.key)
        .bind(&data.gender_key)
        .bind(&data.file_path)
        .bind(created_by)
        .fetch_one(pool)
        .await
    }

    pub async fn update(pool: &SqlitePool, id: Uuid, data: &UpdateSong) -> Result<Self, sqlx::Error> {
        let existing = Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        sqlx::query_as::<_, Self>(
            "UPDATE songs SET title = $2, artist = $3, key = $4, gender_key = $5, file_path = $6
             WHERE id = $1
             RETURNING id, title, artist, key, gender_key, file_path, created_by, created_at",
        )
        .bind(id)
        .bind(data.title.as_ref().unwrap_or(&existing.title))
        .bind(data.artist.as_ref().or(existing.artist.as_ref()))
        .bind(data.key.as_ref().or(existing.key.as_ref()))
        .bind(data.gender_key.as_ref().or(existing.gender_key.as_ref()))
        .bind(data.file_path.as_ref().or(existing.file_path.as_ref()))
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM songs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
