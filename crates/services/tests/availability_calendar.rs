//! Calendar merge invariants: approved leave always wins its date, pending
//! leave never displaces it and is owner-only, rejected/cancelled requests
//! never appear.

use chrono::NaiveDate;
use db::{
    models::{
        availability::MusicianAvailability,
        leave_request::{LeaveRequest, LeaveStatus},
        musician::Musician,
        user::{CreateUser, User, UserRole},
    },
    test_utils::create_test_pool,
};
use services::services::calendar::build_calendar;
use sqlx::SqlitePool;
use uuid::Uuid;

async fn fixture(pool: &SqlitePool) -> (User, Uuid) {
    let user = User::create(
        pool,
        &CreateUser {
            username: "member".to_string(),
            email: "member@example.com".to_string(),
            nickname: None,
            mobile_number: None,
            role: UserRole::CaseManager,
        },
    )
    .await
    .unwrap();
    let (musician, _) = Musician::find_or_create_for_user(pool, user.id, user.display_name())
        .await
        .unwrap();
    (user, musician.id)
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
}

#[tokio::test]
async fn approved_leave_overrides_availability_row() {
    let (pool, _tmp) = create_test_pool().await;
    let (user, musician_id) = fixture(&pool).await;

    // The member marked themselves available, then an approved leave landed
    // on the same date.
    MusicianAvailability::upsert(&pool, musician_id, date(7), true, Some("free all day"))
        .await
        .unwrap();
    LeaveRequest::create(
        &pool,
        user.id,
        musician_id,
        date(7),
        "family trip",
        LeaveStatus::Approved,
        Some(user.id),
    )
    .await
    .unwrap();

    let calendar = build_calendar(&pool, musician_id, true).await.unwrap();
    let entry = calendar.entries.get(&date(7)).expect("date must be present");

    assert!(!entry.is_available, "approved leave always wins");
    assert!(entry.is_approved);
    assert!(!entry.is_pending);
    assert_eq!(entry.notes.as_deref(), Some("family trip"));
}

#[tokio::test]
async fn pending_never_overrides_approved_for_same_date() {
    let (pool, _tmp) = create_test_pool().await;
    let (user, musician_id) = fixture(&pool).await;

    LeaveRequest::create(
        &pool,
        user.id,
        musician_id,
        date(14),
        "approved reason",
        LeaveStatus::Approved,
        Some(user.id),
    )
    .await
    .unwrap();
    LeaveRequest::create(
        &pool,
        user.id,
        musician_id,
        date(14),
        "pending reason",
        LeaveStatus::Pending,
        None,
    )
    .await
    .unwrap();

    let calendar = build_calendar(&pool, musician_id, true).await.unwrap();
    let entry = calendar.entries.get(&date(14)).unwrap();

    assert!(entry.is_approved);
    assert!(!entry.is_pending);
    assert_eq!(entry.notes.as_deref(), Some("approved reason"));
}

#[tokio::test]
async fn pending_overrides_plain_availability_row() {
    let (pool, _tmp) = create_test_pool().await;
    let (user, musician_id) = fixture(&pool).await;

    MusicianAvailability::upsert(&pool, musician_id, date(21), true, None)
        .await
        .unwrap();
    LeaveRequest::create(
        &pool,
        user.id,
        musician_id,
        date(21),
        "doctor visit",
        LeaveStatus::Pending,
        None,
    )
    .await
    .unwrap();

    let calendar = build_calendar(&pool, musician_id, true).await.unwrap();
    let entry = calendar.entries.get(&date(21)).unwrap();

    assert!(!entry.is_available);
    assert!(entry.is_pending);
    assert!(entry.leave_request_id.is_some());
}

#[tokio::test]
async fn pending_is_invisible_to_other_viewers() {
    let (pool, _tmp) = create_test_pool().await;
    let (user, musician_id) = fixture(&pool).await;

    LeaveRequest::create(
        &pool,
        user.id,
        musician_id,
        date(28),
        "private matter",
        LeaveStatus::Pending,
        None,
    )
    .await
    .unwrap();

    let own = build_calendar(&pool, musician_id, true).await.unwrap();
    assert!(own.entries.contains_key(&date(28)));
    assert_eq!(own.pending.len(), 1);

    let other = build_calendar(&pool, musician_id, false).await.unwrap();
    assert!(!other.entries.contains_key(&date(28)));
    assert!(other.pending.is_empty());
}

#[tokio::test]
async fn rejected_and_cancelled_never_appear() {
    let (pool, _tmp) = create_test_pool().await;
    let (user, musician_id) = fixture(&pool).await;

    LeaveRequest::create(
        &pool,
        user.id,
        musician_id,
        date(3),
        "rejected one",
        LeaveStatus::Rejected,
        Some(user.id),
    )
    .await
    .unwrap();
    LeaveRequest::create(
        &pool,
        user.id,
        musician_id,
        date(4),
        "cancelled one",
        LeaveStatus::Cancelled,
        Some(user.id),
    )
    .await
    .unwrap();

    let calendar = build_calendar(&pool, musician_id, true).await.unwrap();
    assert!(calendar.entries.is_empty());
}
