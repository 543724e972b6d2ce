use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// A daily task on the EOD tracker. Priority runs 1 (high) to 3 (low).
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct Task {
    pub id: Uuid,
    pub user_id: Uuid,
    pub task: String,
    pub priority: i64,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub task_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, TS)]
pub struct CreateTask {
    pub task: String,
    #[serde(default = "default_priority")]
    pub priority: i64,
    pub task_date: Option<NaiveDate>,
}

fn default_priority() -> i64 {
    1
}

/// A saved task template that can be instantiated for the current day.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct TaskOption {
    pub id: Uuid,
    pub user_id: Uuid,
    pub task_text: String,
    pub priority: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, TS)]
pub struct CreateTaskOption {
    pub task_text: String,
    #[serde(default = "default_option_priority")]
    pub priority: i64,
}

fn default_option_priority() -> i64 {
    2
}

const TASK_COLUMNS: &str =
    "id, user_id, task, priority, is_completed, completed_at, task_date, created_at, updated_at";

impl Task {
    pub async fn find_for_date(
        pool: &SqlitePool,
        user_id: Uuid,
        date: NaiveDate,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "SELECT {TASK_COLUMNS} FROM tasks
             WHERE user_id = $1 AND task_date = $2
             ORDER BY priority ASC, created_at ASC"
        ))
        .bind(user_id)
        .bind(date)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1"))
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create(
        pool: &SqlitePool,
        user_id: Uuid,
        task: &str,
        priority: i64,
        task_date: NaiveDate,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(&format!(
            "INSERT INTO tasks (id, user_id, task, priority, task_date)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(id)
        .bind(user_id)
        .bind(task)
        .bind(priority)
        .bind(task_date)
        .fetch_one(pool)
        .await
    }

    /// True if the user already has the same task text for the date.
    pub async fn exists_for_date(
        pool: &SqlitePool,
        user_id: Uuid,
        task: &str,
        date: NaiveDate,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM tasks WHERE user_id = $1 AND task = $2 AND task_date = $3)",
        )
        .bind(user_id)
        .bind(task)
        .bind(date)
        .fetch_one(pool)
        .await
        .map(|n| n != 0)
    }

    pub async fn set_completed(
        pool: &SqlitePool,
        id: Uuid,
        completed: bool,
    ) -> Result<Self, sqlx::Error> {
        sqlx::query_as::<_, Self>(&format!(
            "UPDATE tasks
             SET is_completed = $2,
                 completed_at = CASE WHEN $2 THEN datetime('now', 'subsec') ELSE NULL END,
                 updated_at = datetime('now', 'subsec')
             WHERE id = $1
             RETURNING {TASK_COLUMNS}"
        ))
        .bind(id)
        .bind(completed)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

impl TaskOption {
    pub async fn find_for_user(pool: &SqlitePool, user_id: Uuid) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, user_id, task_text, priority, created_at, updated_at
             FROM task_options WHERE user_id = $1 ORDER BY task_text ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_id(pool: &SqlitePool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, user_id, task_text, priority, created_at, updated_at
             FROM task_options WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await
    }

    pub async fn create(
        pool: &SqlitePool,
        user_id: Uuid,
        data: &CreateTaskOption,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query_as::<_, Self>(
            "INSERT INTO task_options (id, user_id, task_text, priority)
             VALUES ($1, $2, $3, $4)
             RETURNING id, user_id, task_text, priority, created_at, updated_at",
        )
        .bind(id)
        .bind(user_id)
        .bind(&data.task_text)
        .bind(data.priority)
        .fetch_one(pool)
        .await
    }

    pub async fn delete(pool: &SqlitePool, id: Uuid) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM task_options WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
