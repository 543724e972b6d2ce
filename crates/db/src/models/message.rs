use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// A chat message. NULL recipient means the team-wide group chat; a set
/// recipient makes it a private message between the two users.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Message {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recipient_id: Option<Uuid>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A private-chat counterpart with the most recent exchanged message.
#[derive(Debug, Clone, FromRow, Serialize, TS)]
pub struct Conversation {
    pub user_id: Uuid,
    pub last_message: String,
    pub last_message_at: DateTime<Utc>,
}

impl Message {
    pub async fn create(
        pool: &SqlitePool,
        user_id: Uuid,
        recipient_id: Option<Uuid>,
        content: &str,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(
            "INSERT INTO messages (id, user_id, recipient_id, content)
             VALUES ($1, $2, $3, $4)
             RETURNING id, user_id, recipient_id, content, created_at",
        )
        .bind(id)
        .bind(user_id)
        .bind(recipient_id)
        .bind(content)
        .fetch_one(pool)
        .await
    }

    /// Last `limit` group messages, oldest first.
    pub async fn find_group_recent(pool: &SqlitePool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, user_id, recipient_id, content, created_at FROM (
                 SELECT id, user_id, recipient_id, content, created_at
                 FROM messages WHERE recipient_id IS NULL
                 ORDER BY created_at DESC LIMIT $1
             ) ORDER BY created_at ASC",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Group messages newer than `since`, oldest first. Drives polling.
    pub async fn find_group_since(
        pool: &SqlitePool,
        since: DateTime<Utc>,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, user_id, recipient_id, content, created_at
             FROM messages WHERE recipient_id IS NULL AND created_at > $1
             ORDER BY created_at ASC",
        )
        .bind(since)
        .fetch_all(pool)
        .await
    }

    /// Full private history between two users, oldest first.
    pub async fn find_pair_history(
        pool: &SqlitePool,
        user_a: Uuid,
        user_b: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, user_id, recipient_id, content, created_at
             FROM messages
             WHERE (user_id = $1 AND recipient_id = $2)
                OR (user_id = $2 AND recipient_id = $1)
             ORDER BY created_at ASC",
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_all(pool)
        .await
    }

    /// Count of private messages sent by `sender` to `recipient`.
    pub async fn count_from_sender(
        pool: &SqlitePool,
        sender: Uuid,
        recipient: Uuid,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM messages WHERE user_id = $1 AND recipient_id = $2",
        )
        .bind(sender)
        .bind(recipient)
        .fetch_one(pool)
        .await
    }

    /// Distinct private-chat counterparts for a user with the latest message
    /// in each conversation, most recent conversation first.
    pub async fn find_conversations(
        pool: &SqlitePool,
        user_id: Uuid,
    ) -> Result<Vec<Conversation>, sqlx::Error> {
        sqlx::query_as::<_, Conversation>(
            "SELECT other.user_id AS user_id, m.content AS last_message,
                    m.created_at AS last_message_at
             FROM (
                 SELECT CASE WHEN user_id = $1 THEN recipient_id ELSE user_id END AS user_id,
                        MAX(created_at) AS last_at
                 FROM messages
                 WHERE recipient_id IS NOT NULL AND (user_id = $1 OR recipient_id = $1)
                 GROUP BY 1
             ) other
             INNER JOIN messages m
                ON m.created_at = other.last_at
               AND ((m.user_id = $1 AND m.recipient_id = other.user_id)
                 OR (m.user_id = other.user_id AND m.recipient_id = $1))
             ORDER BY m.created_at DESC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }
}
