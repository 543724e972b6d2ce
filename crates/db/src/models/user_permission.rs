use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use ts_rs::TS;
use uuid::Uuid;

/// A granular permission grant. Admins and team leaders hold every
/// permission implicitly; everyone else needs an explicit row.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, TS)]
pub struct UserPermission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub permission_type: String,
    pub granted_by: Uuid,
    pub granted_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, TS)]
pub struct GrantPermission {
    pub user_id: Uuid,
    pub permission_type: String,
}

impl UserPermission {
    pub async fn find_for_user(
        pool: &SqlitePool,
        user_id: Uuid,
    ) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, user_id, permission_type, granted_by, granted_at
             FROM user_permissions WHERE user_id = $1 ORDER BY permission_type ASC",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    pub async fn exists(
        pool: &SqlitePool,
        user_id: Uuid,
        permission_type: &str,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT EXISTS(SELECT 1 FROM user_permissions
             WHERE user_id = $1 AND permission_type = $2)",
        )
        .bind(user_id)
        .bind(permission_type)
        .fetch_one(pool)
        .await
        .map(|n| n != 0)
    }

    /// Grant a permission. Re-granting an existing permission is a no-op.
    pub async fn grant(
        pool: &SqlitePool,
        data: &GrantPermission,
        granted_by: Uuid,
    ) -> Result<(), sqlx::Error> {
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT OR IGNORE INTO user_permissions (id, user_id, permission_type, granted_by)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(id)
        .bind(data.user_id)
        .bind(&data.permission_type)
        .bind(granted_by)
        .execute(pool)
        .await?;
        Ok(())
    }

    pub async fn revoke(
        pool: &SqlitePool,
        user_id: Uuid,
        permission_type: &str,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM user_permissions WHERE user_id = $1 AND permission_type = $2",
        )
        .bind(user_id)
        .bind(permission_type)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
