use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// A wall post on a musician profile.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct ProfilePost {
    pub id: Uuid,
    pub musician_id: Uuid,
    pub content: Option<String>,
    pub image_path: Option<String>,
    pub video_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, TS)]
pub struct CreatePost {
    pub content: Option<String>,
    pub image_path: Option<String>,
    pub video_path: Option<String>,
}

#[derive(Debug, Deserialize, TS)]
pub struct UpdatePost {
    pub content: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct PostComment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The state of a post's reactions after a toggle, echoed back to the
/// caller so the UI can update both buttons in one round trip.
#[derive(Debug, Serialize, TS)]
pub struct ReactionState {
    pub action: String,
    pub like_count: i64,
    pub heart_count: i64,
    pub has_like: bool,
    pub has_heart: bool,
}

impl ProfilePost {
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, musician_id, content, image_path, video_path, created_at, updated_at
             FROM profile_posts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_for_musician(
        pool: &SqlitePool,
        musician_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, musician_id, content, image_path, video_path, created_at, updated_at
             FROM profile_posts WHERE musician_id = $1 ORDER BY created_at DESC",
        )
        .bind(musician_id)
        .fetch_all(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        musician_id: Uuid,
        data: &CreatePost,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(
            "INSERT INTO profile_posts (id, musician_id, content, image_path, video_path)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id, musician_id, content, image_path, video_path, created_at, updated_at",
        )
        .bind(id)
        .bind(musician_id)
        .bind(&data.content)
        .bind(&data.image_path)
        .bind(&data.video_path)
        .fetch_one(pool)
        .await
    }

    pub async fn update_content(
        pool: &SqlitePool,
        id: Uuid,
        content: Option<&str>,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "UPDATE profile_posts
             SET content = $2, updated_at = datetime('now', 'subsec')
             WHERE id = $1
             RETURNING id, musician_id, content, image_path, video_path, created_at, updated_at",
        )
        .bind(id)
        .bind(content)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM profile_posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }

    /// Toggle a like. A user holds at most one reaction per post, so adding
    /// a like first clears any heart by the same user.
    pub async fn toggle_like(
        pool: &SqlitePool,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<ReactionState, sqlx::Error> {
        Self::toggle_reaction(pool, post_id, user_id, "post_likes", "post_hearts", "liked", "unliked")
            .await
    }

    /// Toggle a heart; clears any like by the same user when adding.
    pub async fn toggle_heart(
        pool: &SqlitePool,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<ReactionState, sqlx::Error> {
        Self::toggle_reaction(pool, post_id, user_id, "post_hearts", "post_likes", "hearted", "unhearted")
            .await
    }

    async fn toggle_reaction(
        pool: &SqlitePool,
        post_id: Uuid,
        user_id: Uuid,
        table: &str,
        opposite: &str,
        added: &str,
        removed: &str,
    ) -> Result<ReactionState, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let existing = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT EXISTS(SELECT 1 FROM {table} WHERE post_id = $1 AND user_id = $2)"
        ))
        .bind(post_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let action = if existing != 0 {
            sqlx::query(&format!(
                "DELETE FROM {table} WHERE post_id = $1 AND user_id = $2"
            ))
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
            removed
        } else {
            sqlx::query(&format!(
                "DELETE FROM {opposite} WHERE post_id = $1 AND user_id = $2"
            ))
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
            sqlx::query(&format!(
                "INSERT INTO {table} (id, post_id, user_id) VALUES ($1, $2, $3)"
            ))
            .bind(Uuid::new_v4())
            .bind(post_id)
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
            added
        };

        tx.commit().await?;
        Self::reaction_state(pool, post_id, user_id, action).await
    }

    pub async fn reaction_state(
        pool: &SqlitePool,
        post_id: Uuid,
        user_id: Uuid,
        action: &str,
    ) -> Result<ReactionState, sqlx::Error> {
        let (like_count, heart_count, has_like, has_heart): (i64, i64, i64, i64) =
            sqlx::query_as(
                "SELECT
                     (SELECT COUNT(*) FROM post_likes WHERE post_id = $1),
                     (SELECT COUNT(*) FROM post_hearts WHERE post_id = $1),
                     (SELECT EXISTS(SELECT 1 FROM post_likes WHERE post_id = $1 AND user_id = $2)),
                     (SELECT EXISTS(SELECT 1 FROM post_hearts WHERE post_id = $1 AND user_id = $2))",
            )
            .bind(post_id)
            .bind(user_id)
            .fetch_one(pool)
            .await?;

        Ok(ReactionState {
            action: action.to_string(),
            like_count,
            heart_count,
            has_like: has_like != 0,
            has_heart: has_heart != 0,
        })
    }

    /// Record a share. Returns false when the user already shared this post.
    pub async fn record_repost(
        pool: &SqlitePool,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO post_reposts (id, post_id, user_id) VALUES ($1, $2, $3)",
        )
        .bind(Uuid::new_v4())
        .bind(post_id)
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn has_reposted(
        pool: &SqlitePool,
        post_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM post_reposts WHERE post_id = $1 AND user_id = $2)",
        )
        .bind(post_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
        .map(|n| n != 0)
    }
}

impl PostComment {
    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, post_id, user_id, content, created_at, updated_at
             FROM post_comments WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn find_for_post(pool: &SqlitePool, post_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, post_id, user_id, content, created_at, updated_at
             FROM post_comments WHERE post_id = $1 ORDER BY created_at ASC",
        )
        .bind(post_id)
        .fetch_all(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        post_id: Uuid,
        user_id: Uuid,
        content: &str,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(
            "INSERT INTO post_comments (id, post_id, user_id, content)
             VALUES ($1, $2, $3, $4)
             RETURNING id, post_id, user_id, content, created_at, updated_at",
        )
        .bind(id)
        .bind(post_id)
        .bind(user_id)
        .bind(content)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM post_comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
