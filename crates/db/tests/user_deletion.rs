//! Deleting a user must not orphan rows: owned records move to a fallback
//! admin, dependent rows are removed.

mod common;

use chrono::NaiveDate;
use common::{create_musician_for, create_user, setup_pool};
use db::models::{
    journal::{CreateJournal, Journal, JournalEntryType},
    message::Message,
    notification::{CreateNotification, Notification, NotificationType},
    post::{CreatePost, ProfilePost},
    practice::{CreatePractice, Practice},
    service::{CreateService, SundayService},
    user::{User, UserRole},
    user_permission::{GrantPermission, UserPermission},
};
use sqlx::SqlitePool;
use uuid::Uuid;

async fn count_where(pool: &SqlitePool, sql: &str, id: Uuid) -> i64 {
    sqlx::query_scalar::<_, i64>(sql)
        .bind(id)
        .fetch_one(pool)
        .await
        .unwrap()
}

#[tokio::test]
async fn created_by_rows_are_reassigned() {
    let (pool, _tmp) = setup_pool().await;
    let admin = create_user(&pool, "admin", UserRole::Admin).await;
    let departing = create_user(&pool, "departing", UserRole::CaseManager).await;

    let date = NaiveDate::from_ymd_opt(2025, 8, 10).unwrap();
    let service = SundayService::create(
        &pool,
        &CreateService {
            date,
            theme: None,
            notes: None,
        },
        departing.id,
    )
    .await
    .unwrap();
    let practice = Practice::create(
        &pool,
        &CreatePractice {
            date,
            time: None,
            location: None,
            purpose: None,
            notes: None,
        },
        departing.id,
    )
    .await
    .unwrap();

    User::delete_with_reassignment(&pool, departing.id, admin.id)
        .await
        .unwrap();

    assert!(User::find_by_id(&pool, departing.id).await.unwrap().is_none());

    let service = SundayService::find_by_id(&pool, service.id).await.unwrap().unwrap();
    assert_eq!(service.created_by, admin.id, "service survives under admin");
    let practice = Practice::find_by_id(&pool, practice.id).await.unwrap().unwrap();
    assert_eq!(practice.created_by, admin.id, "practice survives under admin");
}

#[tokio::test]
async fn dependent_rows_are_removed() {
    let (pool, _tmp) = setup_pool().await;
    let admin = create_user(&pool, "admin", UserRole::Admin).await;
    let departing = create_user(&pool, "departing", UserRole::CaseManager).await;
    let other = create_user(&pool, "other", UserRole::CaseManager).await;
    let other_musician = create_musician_for(&pool, &other).await;

    // Rows referencing the departing user under NOT NULL constraints.
    UserPermission::grant(
        &pool,
        &GrantPermission {
            user_id: departing.id,
            permission_type: "edit_practices".to_string(),
        },
        admin.id,
    )
    .await
    .unwrap();

    let post = ProfilePost::create(
        &pool,
        other_musician,
        &CreatePost {
            content: Some("hi".to_string()),
            image_path: None,
            video_path: None,
        },
    )
    .await
    .unwrap();
    ProfilePost::toggle_like(&pool, post.id, departing.id).await.unwrap();

    Notification::create(
        &pool,
        &CreateNotification::new(departing.id, NotificationType::Like, other.id).post(post.id),
    )
    .await
    .unwrap();

    Journal::create(
        &pool,
        departing.id,
        &CreateJournal {
            entry_type: JournalEntryType::Prayer,
            title: None,
            content: Some("entry".to_string()),
            application: None,
            prayer_text: None,
            image_path: None,
            mood_emojis: None,
            date: NaiveDate::from_ymd_opt(2025, 8, 1).unwrap(),
        },
    )
    .await
    .unwrap();

    Message::create(&pool, departing.id, Some(other.id), "bye").await.unwrap();
    Message::create(&pool, other.id, Some(departing.id), "bye back").await.unwrap();

    User::delete_with_reassignment(&pool, departing.id, admin.id)
        .await
        .unwrap();

    let id = departing.id;
    assert_eq!(
        count_where(&pool, "SELECT COUNT(*) FROM user_permissions WHERE user_id = $1", id).await,
        0
    );
    assert_eq!(
        count_where(&pool, "SELECT COUNT(*) FROM post_likes WHERE user_id = $1", id).await,
        0
    );
    assert_eq!(
        count_where(&pool, "SELECT COUNT(*) FROM notifications WHERE user_id = $1", id).await,
        0
    );
    assert_eq!(
        count_where(&pool, "SELECT COUNT(*) FROM journal_entries WHERE user_id = $1", id).await,
        0
    );
    assert_eq!(
        count_where(
            &pool,
            "SELECT COUNT(*) FROM messages WHERE user_id = $1 OR recipient_id = $1",
            id
        )
        .await,
        0
    );
}

#[tokio::test]
async fn linked_musician_profile_is_unlinked_not_deleted() {
    let (pool, _tmp) = setup_pool().await;
    let admin = create_user(&pool, "admin", UserRole::Admin).await;
    let departing = create_user(&pool, "departing", UserRole::CaseManager).await;
    let musician_id = create_musician_for(&pool, &departing).await;

    User::delete_with_reassignment(&pool, departing.id, admin.id)
        .await
        .unwrap();

    let musician = db::models::musician::Musician::find_by_id(&pool, musician_id)
        .await
        .unwrap()
        .expect("profile should survive the user");
    assert_eq!(musician.user_id, None);
}
