use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// A Sunday service: a dated event musicians are assigned to.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct SundayService {
    pub id: Uuid,
    pub date: NaiveDate,
    pub theme: Option<String>,
    pub notes: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, TS)]
pub struct CreateService {
    pub date: NaiveDate,
    pub theme: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
pub struct UpdateService {
    pub date: Option<NaiveDate>,
    pub theme: Option<String>,
    pub notes: Option<String>,
}

/// A musician assigned to a service with an instrument and optional role.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct ServiceMusician {
    pub id: Uuid,
    pub service_id: Uuid,
    pub musician_id: Uuid,
    pub instrument: String,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
pub struct AssignServiceMusician {
    pub musician_id: Uuid,
    pub instrument: String,
    pub role: Option<String>,
}

impl SundayService {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, date, theme, notes, created_by, created_at
             FROM sunday_services ORDER BY date DESC",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_upcoming(
        pool: &SqlitePool,
        from: NaiveDate,
        limit: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, date, theme, notes, created_by, created_at
             FROM sunday_services WHERE date >= $1 ORDER BY date ASC LIMIT $2",
        )
        .bind(from)
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, date, theme, notes, created_by, created_at
             FROM sunday_services WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateService,
        created_by: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(
            "INSERT INTO sunday_services (id, date, theme, notes, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, date, theme, notes, created_by, created_at",
        )
        .bind(id)
        .bind(data.date)
        .bind(&data.theme)
        .bind(&data.notes)
        .bind(created_by)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateService,
    ) -> Result<Self, sqlx::Error> {
        let existing = Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        sqlx::query_as::<_, Self>(
            "UPDATE sunday_services SET date = $2, theme = $3, notes = $4 WHERE id = $1
             RETURNING id, date, theme, notes, created_by, created_at",
        )
        .bind(id)
        .bind(data.date.unwrap_or(existing.date))
        .bind(data.theme.as_ref().or(existing.theme.as_ref()))
        .bind(data.notes.as_ref().or(existing.notes.as_ref()))
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM sunday_services WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

impl ServiceMusician {
    pub async fn find_for_service(
        pool: &SqlitePool,
        service_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, service_id, musician_id, instrument, role
             FROM service_musicians WHERE service_id = $1",
        )
        .bind(service_id)
        .fetch_all(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        service_id: Uuid,
        data: &AssignServiceMusician,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(
            "INSERT INTO service_musicians (id, service_id, musician_id, instrument, role)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, service_id, musician_id, instrument, role",
        )
        .bind(id)
        .bind(service_id)
        .bind(data.musician_id)
        .bind(&data.instrument)
        .bind(&data.role)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM service_musicians WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
