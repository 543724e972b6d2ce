use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// A practice session with an assigned band and an ordered song lineup.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Practice {
    pub id: Uuid,
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub purpose: Option<String>,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, TS)]
pub struct CreatePractice {
    pub date: NaiveDate,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub purpose: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
pub struct UpdatePractice {
    pub date: Option<NaiveDate>,
    pub time: Option<NaiveTime>,
    pub location: Option<String>,
    pub purpose: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct PracticeMusician {
    pub id: Uuid,
    pub practice_id: Uuid,
    pub musician_id: Uuid,
    pub instrument: String,
}

#[derive(Debug, Deserialize, TS)]
pub struct AssignPracticeMusician {
    pub musician_id: Uuid,
    pub instrument: String,
}

/// One lineup row. `song_id` points at the song library; free-text entries
/// leave it NULL and carry the title in `song_name`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct PracticeSong {
    pub id: Uuid,
    pub practice_id: Uuid,
    pub song_id: Option<Uuid>,
    pub song_name: Option<String>,
    pub key: Option<String>,
    pub speed: Option<String>,
    pub prepared_by: Option<Uuid>,
    pub sort_order: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, TS)]
pub struct AddPracticeSong {
    pub song_id: Option<Uuid>,
    pub song_name: Option<String>,
    pub key: Option<String>,
    pub speed: Option<String>,
    pub prepared_by: Option<Uuid>,
}

impl Practice {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, date, time, location, purpose, notes, created_by, created_at
             FROM practices ORDER BY date DESC",
        )
        .fetch_all(pool)
        .await
    }

    /// The next practice on or after `from`, if any.
    pub async fn find_next(pool: &SqlitePool, from: NaiveDate) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, date, time, location, purpose, notes, created_by, created_at
             FROM practices WHERE date >= $1 ORDER BY date ASC LIMIT 1",
        )
        .bind(from)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, date, time, location, purpose, notes, created_by, created_at
             FROM practices WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreatePractice,
        created_by: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(
            "INSERT INTO practices (id, date, time, location, purpose, notes, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING id, date, time, location, purpose, notes, created_by, created_at",
        )
        .bind(id)
        .bind(data.date)
        .bind(data.time)
        .bind(&data.location)
        .bind(&data.purpose)
        .bind(&data.notes)
        .bind(created_by)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdatePractice,
    ) -> Result<Self, sqlx::Error> {
        let existing = Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        sqlx::query_as::<_, Self>(
            "UPDATE practices
             SET date = $2, time = $3, location = $4, purpose = $5, notes = $6
             WHERE id = $1
             RETURNING id, date, time, location, purpose, notes, created_by, created_at",
        )
        .bind(id)
        .bind(data.date.unwrap_or(existing.date))
        .bind(data.time.or(existing.time))
        .bind(data.location.as_ref().or(existing.location.as_ref()))
        .bind(data.purpose.as_ref().or(existing.purpose.as_ref()))
        .bind(data.notes.as_ref().or(existing.notes.as_ref()))
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM practices WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_all(pool: &SqlitePool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM practices").execute(pool).await?;
        Ok(result.rows_affected())
    }
}

impl PracticeMusician {
    pub async fn find_for_practice(
        pool: &SqlitePool,
        practice_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, practice_id, musician_id, instrument
             FROM practice_musicians WHERE practice_id = $1",
        )
        .bind(practice_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, practice_id, musician_id, instrument
             FROM practice_musicians WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        practice_id: Uuid,
        data: &AssignPracticeMusician,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(
            "INSERT INTO practice_musicians (id, practice_id, musician_id, instrument)
             VALUES ($1, $2, $3, $4)
             RETURNING id, practice_id, musician_id, instrument",
        )
        .bind(id)
        .bind(practice_id)
        .bind(data.musician_id)
        .bind(&data.instrument)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM practice_musicians WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

impl PracticeSong {
    pub async fn find_for_practice(
        pool: &SqlitePool,
        practice_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, practice_id, song_id, song_name, key, speed, prepared_by, sort_order, created_at
             FROM practice_songs WHERE practice_id = $1 ORDER BY sort_order ASC",
        )
        .bind(practice_id)
        .fetch_all(pool)
        .await
    }

    /// Append a lineup row after the current last position.
    pub async fn append(
        pool: &SqlitePool,
        practice_id: Uuid,
        data: &AddPracticeSong,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(
            "INSERT INTO practice_songs (id, practice_id, song_id, song_name, key, speed, prepared_by, sort_order)
             VALUES ($1, $2, $3, $4, $5, $6, $7,
                     (SELECT COALESCE(MAX(sort_order), -1) + 1 FROM practice_songs WHERE practice_id = $2))
             RETURNING id, practice_id, song_id, song_name, key, speed, prepared_by, sort_order, created_at",
        )
        .bind(id)
        .bind(practice_id)
        .bind(data.song_id)
        .bind(&data.song_name)
        .bind(&data.key)
        .bind(&data.speed)
        .bind(data.prepared_by)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM practice_songs WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
