use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// A team member's public profile. Optionally linked to a login user;
/// profiles are auto-provisioned from the user on first access rather than
/// treated as an error when missing.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Musician {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub outlook_email: Option<String>,
    pub whatsapp: Option<String>,
    /// Comma-separated list
    pub instruments: Option<String>,
    pub bio: Option<String>,
    pub roles: Option<String>,
    pub interests: Option<String>,
    pub profile_picture: Option<String>,
    pub banner: Option<String>,
    pub background_image: Option<String>,
    pub background_color: Option<String>,
    pub custom_css: Option<String>,
    pub music_player_embed: Option<String>,
    pub profile_theme: String,
    pub text_color: Option<String>,
    pub link_color: Option<String>,
    pub profile_views: i64,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

const ALL_COLUMNS: &str = "id, name, email, phone, mobile, outlook_email, whatsapp, instruments, \
     bio, roles, interests, profile_picture, banner, background_image, background_color, \
     custom_css, music_player_embed, profile_theme, text_color, link_color, profile_views, \
     user_id, created_at";

#[derive(Debug, Default, Deserialize, TS)]
pub struct UpdateMusician {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub outlook_email: Option<String>,
    pub whatsapp: Option<String>,
    pub instruments: Option<String>,
    pub bio: Option<String>,
    pub roles: Option<String>,
    pub interests: Option<String>,
}

/// Profile customization fields, edited on a separate page.
#[derive(Debug, Default, Deserialize, TS)]
pub struct UpdateCustomization {
    pub background_image: Option<String>,
    pub background_color: Option<String>,
    pub custom_css: Option<String>,
    pub music_player_embed: Option<String>,
    pub profile_theme: Option<String>,
    pub text_color: Option<String>,
    pub link_color: Option<String>,
}

impl Musician {
    pub async fn find_all(pool: &SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {ALL_COLUMNS} FROM musicians ORDER BY name ASC"
        ))
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!("SELECT {ALL_COLUMNS} FROM musicians WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_user_id(
        pool: &SqlitePool,
        user_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {ALL_COLUMNS} FROM musicians WHERE user_id = $1"
        ))
        .bind(user_id)
        .fetch_optional(pool)
        .await
    }

    /// Profiles created within the last `days` days that are linked to a
    /// login user, newest first. Feeds the dashboard's new-members panel.
    pub async fn find_recent_linked(
        pool: &SqlitePool,
        days: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT m.* FROM musicians m
             INNER JOIN users u ON u.id = m.user_id
             WHERE m.created_at >= datetime('now', '-' || $1 || ' days')
             ORDER BY m.created_at DESC",
        )
        .bind(days)
        .fetch_all(pool)
        .await
    }

    /// Fetch the profile for a user, creating a bare one when missing.
    /// Returns the profile and whether it was just created.
    pub async fn find_or_create_for_user(
        pool: &SqlitePool,
        user_id: Uuid,
        display_name: &str,
    ) -> Result<(Self, bool), sqlx::Error> {
        if let Some(existing) = Self::find_by_user_id(pool, user_id).await? {
            return Ok((existing, false));
        }
        let id = Uuid::new_v4();
        let created = sqlx::query_as::<_, Self>(&format!(
            "INSERT INTO musicians (id, name, user_id) VALUES ($1, $2, $3)
             RETURNING {ALL_COLUMNS}"
        ))
        .bind(id)
        .bind(display_name)
        .bind(user_id)
        .fetch_one(pool)
        .await?;
        Ok((created, true))
    }

    pub async fn update(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateMusician,
    ) -> Result<Self, sqlx::Error> {
        let existing = Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        sqlx::query_as::<_, Self>(&format!(
            "UPDATE musicians
             SET name = $2, email = $3, phone = $4, mobile = $5, outlook_email = $6,
                 whatsapp = $7, instruments = $8, bio = $9, roles = $10, interests = $11
             WHERE id = $1
             RETURNING {ALL_COLUMNS}"
        ))
        .bind(id)
        .bind(data.name.as_ref().unwrap_or(&existing.name))
        .bind(data.email.as_ref().or(existing.email.as_ref()))
        .bind(data.phone.as_ref().or(existing.phone.as_ref()))
        .bind(data.mobile.as_ref().or(existing.mobile.as_ref()))
        .bind(data.outlook_email.as_ref().or(existing.outlook_email.as_ref()))
        .bind(data.whatsapp.as_ref().or(existing.whatsapp.as_ref()))
        .bind(data.instruments.as_ref().or(existing.instruments.as_ref()))
        .bind(data.bio.as_ref().or(existing.bio.as_ref()))
        .bind(data.roles.as_ref().or(existing.roles.as_ref()))
        .bind(data.interests.as_ref().or(existing.interests.as_ref()))
        .fetch_one(pool)
        .await
    }

    pub async fn update_customization(
        pool: &SqlitePool,
        id: Uuid,
        data: &UpdateCustomization,
    ) -> Result<Self, sqlx::Error> {
        let existing = Self::find_by_id(pool, id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;

        sqlx::query_as::<_, Self>(&format!(
            "UPDATE musicians
             SET background_image = $2, background_color = $3, custom_css = $4,
                 music_player_embed = $5, profile_theme = $6, text_color = $7, link_color = $8
             WHERE id = $1
             RETURNING {ALL_COLUMNS}"
        ))
        .bind(id)
        .bind(data.background_image.as_ref().or(existing.background_image.as_ref()))
        .bind(data.background_color.as_ref().or(existing.background_color.as_ref()))
        .bind(data.custom_css.as_ref().or(existing.custom_css.as_ref()))
        .bind(data.music_player_embed.as_ref().or(existing.music_player_embed.as_ref()))
        .bind(data.profile_theme.as_ref().unwrap_or(&existing.profile_theme))
        .bind(data.text_color.as_ref().or(existing.text_color.as_ref()))
        .bind(data.link_color.as_ref().or(existing.link_color.as_ref()))
        .fetch_one(pool)
        .await
    }

    pub async fn set_profile_picture(
        pool: &SqlitePool,
        id: Uuid,
        path: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE musicians SET profile_picture = $2 WHERE id = $1")
            .bind(id)
            .bind(path)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn set_banner(
        pool: &SqlitePool,
        id: Uuid,
        path: Option<&str>,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE musicians SET banner = $2 WHERE id = $1")
            .bind(id)
            .bind(path)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn increment_profile_views(pool: &SqlitePool, id: Uuid) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE musicians SET profile_views = profile_views + 1 WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM musicians WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
