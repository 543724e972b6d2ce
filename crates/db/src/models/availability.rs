use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// One calendar-day availability flag for a musician. (musician, date) is
/// unique; approved leave is layered on top of these rows when the calendar
/// is assembled.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct MusicianAvailability {
    pub id: Uuid,
    pub musician_id: Uuid,
    pub date: NaiveDate,
    pub is_available: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl MusicianAvailability {
    pub async fn find_for_musician(
        pool: &SqlitePool,
        musician_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, musician_id, date, is_available, notes, created_at
             FROM musician_availability WHERE musician_id = $1 ORDER BY date ASC",
        )
        .bind(musician_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_for_date(
        pool: &SqlitePool,
        musician_id: Uuid,
        date: NaiveDate,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, musician_id, date, is_available, notes, created_at
             FROM musician_availability WHERE musician_id = $1 AND date = $2",
        )
        .bind(musician_id)
        .bind(date)
        .fetch_optional(pool)
        .await
    }

    /// Insert or update the availability row for a (musician, date).
    pub async fn upsert(
        pool: &SqlitePool,
        musician_id: Uuid,
        date: NaiveDate,
        is_available: bool,
        notes: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(
            "INSERT INTO musician_availability (id, musician_id, date, is_available, notes)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (musician_id, date)
             DO UPDATE SET is_available = excluded.is_available, notes = excluded.notes
             RETURNING id, musician_id, date, is_available, notes, created_at",
        )
        .bind(id)
        .bind(musician_id)
        .bind(date)
        .bind(is_available)
        .bind(notes)
        .fetch_one(pool)
        .await
    }

    /// Remove the row for a date. Missing rows are not an error.
    pub async fn delete_for_date(
        pool: &SqlitePool,
        musician_id: Uuid,
        date: NaiveDate,
    ) -> Result<u64, sqlx::Error> {
        let result =
            sqlx::query("DELETE FROM musician_availability WHERE musician_id = $1 AND date = $2")
                .bind(musician_id)
                .bind(date)
                .execute(pool)
                .await?;
        Ok(result.rows_affected())
    }
}
