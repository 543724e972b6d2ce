use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool, Type};
use strum_macros::{Display, EnumString};
use ts_rs::TS;
use uuid::Uuid;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize, TS, EnumString, Display,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SlideFileType {
    Word,
    Excel,
    Csv,
    Image,
    Pdf,
    Txt,
}

impl SlideFileType {
    /// Classify an uploaded file by its extension. Unknown extensions fall
    /// back to `Txt` so the record is still viewable as a download.
    pub fn from_filename(filename: &str) -> Self {
        let ext = filename
            .rsplit('.')
            .next()
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "doc" | "docx" => Self::Word,
            "xls" | "xlsx" => Self::Excel,
            "csv" => Self::Csv,
            "png" | "jpg" | "jpeg" | "gif" | "webp" => Self::Image,
            "pdf" => Self::Pdf,
            _ => Self::Txt,
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize, TS, EnumString, Display, Default,
)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SlideLanguage {
    English,
    Tagalog,
    Ilocano,
    #[default]
    Others,
}

/// A job-aid document: uploaded reference material with metadata for the
/// library view.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Slide {
    pub id: Uuid,
    pub title: String,
    pub artist: Option<String>,
    pub language: Option<SlideLanguage>,
    pub file_type: Option<SlideFileType>,
    pub file_path: Option<String>,
    pub description: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, TS)]
pub struct CreateSlide {
    pub title: String,
    pub artist: Option<String>,
    pub language: Option<SlideLanguage>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
pub struct UpdateSlide {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub language: Option<SlideLanguage>,
    pub description: Option<String>,
}

impl Slide {
    pub async fn find_all(
        pool: &SqlitePool,
        language: Option<SlideLanguage>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        match language {
            Some(lang) => {
                sqlx::query_as::<_, Self>(
                    "SELECT id, title, artist, language, file_type, file_path, description,
                            created_by, created_at
                     FROM slides WHERE language = $1 ORDER BY title ASC",
                )
                .bind(lang)
                .fetch_all(pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Self>(
                    "SELECT id, title, artist, language, file_type, file_path, description,
                            created_by, created_at
                     FROM slides ORDER BY title ASC",
                )
                .fetch_all(pool)
                .await
            }
        }
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, title, artist, language, file_type, file_path, description,
                    created_by, created_at
             FROM slides WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        data: &CreateSlide,
        file_type: Option<SlideFileType>,
        file_path: Option<&str>,
        created_by: Uuid,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(
            "INSERT INTO slides (id, title, artist, language, file_type, file_path, description, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
             RETURNING id, title, artist, language, file_type, file_path, description,
                       created_by, created_at",
        )
        .bind(id)
        .bind(&data.title)
        .bind(&data.artist)
        .bind(data.language)
        .bind(file_type)
        .bind(file_path)
        .bind(&data.description)
        .bind(created_by)
        .fetch_one(pool)
        .await
    }

    pub async fn update(pool: &SqlitePool, id: Uuid, data: &UpdateSlide) -> Result<Self, sqlx::Error> {
        let existing = Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        sqlx::query_as::<_, Self>(
            "UPDATE slides SET title = $2, artist = $3, language = $4, description = $5
             WHERE id = $1
             RETURNING id, title, artist, language, file_type, file_path, description,
                       created_by, created_at",
        )
        .bind(id)
        .bind(data.title.as_ref().unwrap_or(&existing.title))
        .bind(data.artist.as_ref().or(existing.artist.as_ref()))
        .bind(data.language.or(existing.language))
        .bind(data.description.as_ref().or(existing.description.as_ref()))
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM slides WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_type_detection_covers_common_extensions() {
        assert_eq!(SlideFileType::from_filename("guide.docx"), SlideFileType::Word);
        assert_eq!(SlideFileType::from_filename("sheet.XLSX"), SlideFileType::Excel);
        assert_eq!(SlideFileType::from_filename("data.csv"), SlideFileType::Csv);
        assert_eq!(SlideFileType::from_filename("chart.jpeg"), SlideFileType::Image);
        assert_eq!(SlideFileType::from_filename("manual.pdf"), SlideFileType::Pdf);
        assert_eq!(SlideFileType::from_filename("notes"), SlideFileType::Txt);
    }
}
