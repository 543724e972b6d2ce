//! Filing, approving, rejecting, and cancelling leave keeps the request,
//! the availability row, and the notification fan-out consistent.

use chrono::NaiveDate;
use db::{
    models::{
        availability::MusicianAvailability,
        leave_request::{LeaveRequest, LeaveStatus},
        musician::Musician,
        notification::Notification,
        user::{CreateUser, User, UserRole},
    },
    test_utils::create_test_pool,
};
use services::services::leave::{self, LeaveError};
use sqlx::SqlitePool;
use uuid::Uuid;

async fn make_user(pool: &SqlitePool, username: &str, role: UserRole) -> User {
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
    .unwrap()
}

async fn musician_of(pool: &SqlitePool, user: &User) -> Uuid {
    let (m, _) = Musician::find_or_create_for_user(pool, user.id, user.display_name())
        .await
        .unwrap();
    m.id
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, day).unwrap()
}

#[tokio::test]
async fn filing_as_member_creates_pending_and_notifies_leaders() {
    let (pool, _tmp) = create_test_pool().await;
    let leader = make_user(&pool, "leader", UserRole::TeamLeader).await;
    let member = make_user(&pool, "member", UserRole::CaseManager).await;
    let musician_id = musician_of(&pool, &member).await;

    let filed = leave::file_leave(&pool, &member, musician_id, date(6), "errand")
        .await
        .unwrap();

    assert!(!filed.auto_approved);
    assert_eq!(filed.request.status, LeaveStatus::Pending);
    // No availability override until a leader approves.
    assert!(
        MusicianAvailability::find_for_date(&pool, musician_id, date(6))
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(Notification::unread_count(&pool, leader.id).await.unwrap(), 1);
}

#[tokio::test]
async fn filing_as_leader_is_auto_approved_with_availability_row() {
    let (pool, _tmp) = create_test_pool().await;
    let leader = make_user(&pool, "leader", UserRole::TeamLeader).await;
    let musician_id = musician_of(&pool, &leader).await;

    let filed = leave::file_leave(&pool, &leader, musician_id, date(7), "conference")
        .await
        .unwrap();

    assert!(filed.auto_approved);
    assert_eq!(filed.request.status, LeaveStatus::Approved);
    assert_eq!(filed.request.reviewed_by, Some(leader.id));

    let row = MusicianAvailability::find_for_date(&pool, musician_id, date(7))
        .await
        .unwrap()
        .expect("availability row written on auto-approval");
    assert!(!row.is_available);
    assert_eq!(row.notes.as_deref(), Some("conference"));
}

#[tokio::test]
async fn duplicate_filing_for_same_date_is_rejected() {
    let (pool, _tmp) = create_test_pool().await;
    let member = make_user(&pool, "member", UserRole::CaseManager).await;
    let musician_id = musician_of(&pool, &member).await;

    leave::file_leave(&pool, &member, musician_id, date(8), "first")
        .await
        .unwrap();
    let second = leave::file_leave(&pool, &member, musician_id, date(8), "second").await;

    assert!(matches!(second, Err(LeaveError::DuplicateDate)));
}

#[tokio::test]
async fn missing_reason_is_rejected() {
    let (pool, _tmp) = create_test_pool().await;
    let member = make_user(&pool, "member", UserRole::CaseManager).await;
    let musician_id = musician_of(&pool, &member).await;

    let result = leave::file_leave(&pool, &member, musician_id, date(9), "   ").await;
    assert!(matches!(result, Err(LeaveError::MissingReason)));
}

#[tokio::test]
async fn approval_writes_override_and_notifies_requester() {
    let (pool, _tmp) = create_test_pool().await;
    let leader = make_user(&pool, "leader", UserRole::TeamLeader).await;
    let member = make_user(&pool, "member", UserRole::CaseManager).await;
    let musician_id = musician_of(&pool, &member).await;

    let filed = leave::file_leave(&pool, &member, musician_id, date(10), "wedding")
        .await
        .unwrap();
    let approved = leave::approve(&pool, &leader, filed.request.id).await.unwrap();

    assert_eq!(approved.status, LeaveStatus::Approved);
    assert_eq!(approved.reviewed_by, Some(leader.id));
    assert!(approved.reviewed_at.is_some());

    let row = MusicianAvailability::find_for_date(&pool, musician_id, date(10))
        .await
        .unwrap()
        .unwrap();
    assert!(!row.is_available);

    assert_eq!(Notification::unread_count(&pool, member.id).await.unwrap(), 1);
}

#[tokio::test]
async fn approving_twice_fails() {
    let (pool, _tmp) = create_test_pool().await;
    let leader = make_user(&pool, "leader", UserRole::TeamLeader).await;
    let member = make_user(&pool, "member", UserRole::CaseManager).await;
    let musician_id = musician_of(&pool, &member).await;

    let filed = leave::file_leave(&pool, &member, musician_id, date(11), "trip")
        .await
        .unwrap();
    leave::approve(&pool, &leader, filed.request.id).await.unwrap();
    let again = leave::approve(&pool, &leader, filed.request.id).await;

    assert!(matches!(again, Err(LeaveError::AlreadyProcessed)));
}

#[tokio::test]
async fn rejection_keeps_calendar_untouched_and_stores_notes() {
    let (pool, _tmp) = create_test_pool().await;
    let leader = make_user(&pool, "leader", UserRole::TeamLeader).await;
    let member = make_user(&pool, "member", UserRole::CaseManager).await;
    let musician_id = musician_of(&pool, &member).await;

    let filed = leave::file_leave(&pool, &member, musician_id, date(12), "concert")
        .await
        .unwrap();
    let rejected = leave::reject(&pool, &leader, filed.request.id, Some("short staffed"))
        .await
        .unwrap();

    assert_eq!(rejected.status, LeaveStatus::Rejected);
    assert_eq!(rejected.review_notes.as_deref(), Some("short staffed"));
    assert!(
        MusicianAvailability::find_for_date(&pool, musician_id, date(12))
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn approve_all_clears_the_pending_queue() {
    let (pool, _tmp) = create_test_pool().await;
    let leader = make_user(&pool, "leader", UserRole::TeamLeader).await;
    let alice = make_user(&pool, "alice", UserRole::CaseManager).await;
    let bob = make_user(&pool, "bob", UserRole::CaseManager).await;
    let alice_m = musician_of(&pool, &alice).await;
    let bob_m = musician_of(&pool, &bob).await;

    leave::file_leave(&pool, &alice, alice_m, date(13), "a").await.unwrap();
    leave::file_leave(&pool, &bob, bob_m, date(13), "b").await.unwrap();

    let count = leave::approve_all(&pool, &leader).await.unwrap();
    assert_eq!(count, 2);
    assert!(LeaveRequest::find_all_pending(&pool).await.unwrap().is_empty());

    let empty = leave::approve_all(&pool, &leader).await;
    assert!(matches!(empty, Err(LeaveError::NothingPending)));
}

#[tokio::test]
async fn only_the_requester_may_cancel_an_approved_leave() {
    let (pool, _tmp) = create_test_pool().await;
    let leader = make_user(&pool, "leader", UserRole::TeamLeader).await;
    let member = make_user(&pool, "member", UserRole::CaseManager).await;
    let other = make_user(&pool, "other", UserRole::CaseManager).await;
    let musician_id = musician_of(&pool, &member).await;

    let filed = leave::file_leave(&pool, &member, musician_id, date(14), "leave")
        .await
        .unwrap();
    leave::approve(&pool, &leader, filed.request.id).await.unwrap();

    let denied = leave::cancel_approved(&pool, &other, musician_id, date(14)).await;
    assert!(matches!(denied, Err(LeaveError::NotRequester)));

    let cancelled = leave::cancel_approved(&pool, &member, musician_id, date(14))
        .await
        .unwrap();
    assert_eq!(cancelled.status, LeaveStatus::Cancelled);

    // The availability override is gone with the leave.
    assert!(
        MusicianAvailability::find_for_date(&pool, musician_id, date(14))
            .await
            .unwrap()
            .is_none()
    );
}
