//! Shared fixtures for database integration tests.

use db::models::user::{CreateUser, User, UserRole};
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use std::str::FromStr;
use tempfile::TempDir;
use uuid::Uuid;

/// Fresh database with the full schema applied.
pub async fn setup_pool() -> (SqlitePool, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");

    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))
        .expect("Invalid database URL")
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .min_connections(1)
        .max_connections(5)
        .connect_with(options)
        .await
        .expect("Failed to create pool");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    (pool, temp_dir)
}

pub async fn create_user(pool: &SqlitePool, username: &str, role: UserRole) -> User {
    User::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            nickname: None,
            mobile_number: None,
            role,
        },
    )
    .await
    .expect("Failed to create user")
}

pub async fn create_musician_for(pool: &SqlitePool, user: &User) -> Uuid {
    let (musician, _) =
        db::models::musician::Musician::find_or_create_for_user(pool, user.id, user.display_name())
            .await
            .expect("Failed to create musician");
    musician.id
}
