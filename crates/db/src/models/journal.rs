use chrono::{DateTime, NaiveDate, Utc};
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
pub enum JournalEntryType {
    MoodBoard,
    Prayer,
    AnsweredPrayer,
    Devotion,
    Gospel,
}

/// A personal journal entry. Devotion entries use the title/content/
/// application/prayer_text quartet; mood boards use image + emojis.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Journal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub entry_type: JournalEntryType,
    pub title: Option<String>,
    pub content: Option<String>,
    pub application: Option<String>,
    pub prayer_text: Option<String>,
    pub image_path: Option<String>,
    pub mood_emojis: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, TS)]
pub struct CreateJournal {
    pub entry_type: JournalEntryType,
    pub title: Option<String>,
    pub content: Option<String>,
    pub application: Option<String>,
    pub prayer_text: Option<String>,
    pub image_path: Option<String>,
    pub mood_emojis: Option<String>,
    pub date: NaiveDate,
}

#[derive(Debug, Deserialize, TS)]
pub struct UpdateJournal {
    pub title: Option<String>,
    pub content: Option<String>,
    pub application: Option<String>,
    pub prayer_text: Option<String>,
    pub mood_emojis: Option<String>,
    pub date: Option<NaiveDate>,
}

const ALL_COLUMNS: &str = "id, user_id, entry_type, title, content, application, prayer_text, \
     image_path, mood_emojis, date, created_at, updated_at";

impl Journal {
    pub async fn find_for_user(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {ALL_COLUMNS} FROM journal_entries
             WHERE user_id = $1 ORDER BY date DESC, created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {ALL_COLUMNS} FROM journal_entries WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        user_id: Uuid,
        data: &CreateJournal,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(&format!(
            "INSERT INTO journal_entries (id, user_id, entry_type, title, content, application,
                                          prayer_text, image_path, mood_emojis, date)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
             RETURNING {ALL_COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .bind(data.entry_type)
        .bind(&data.title)
        .bind(&data.content)
        .bind(&data.application)
        .bind(&data.prayer_text)
        .bind(&data.image_path)
        .bind(&data.mood_emojis)
        .bind(data.date)
        .fetch_one(pool)
        .await
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateJournal,
    ) -> Result<Self, sqlx::Error> {
        let existing = Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        sqlx::query_as::<_, Self>(&format!(
            "UPDATE journal_entries
             SET title = $2, content = $3, application = $4, prayer_text = $5,
                 mood_emojis = $6, date = $7, updated_at = datetime('now', 'subsec')
             WHERE id = $1
             RETURNING {ALL_COLUMNS}"
        ))
        .bind(id)
        .bind(data.title.as_ref().or(existing.title.as_ref()))
        .bind(data.content.as_ref().or(existing.content.as_ref()))
        .bind(data.application.as_ref().or(existing.application.as_ref()))
        .bind(data.prayer_text.as_ref().or(existing.prayer_text.as_ref()))
        .bind(data.mood_emojis.as_ref().or(existing.mood_emojis.as_ref()))
        .bind(data.date.unwrap_or(existing.date))
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM journal_entries WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
