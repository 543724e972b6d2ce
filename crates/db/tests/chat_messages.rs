//! Group vs private message routing and conversation listing.

mod common;

use std::time::Duration;

use common::{create_user, setup_pool};
use db::models::{message::Message, user::UserRole};

/// Timestamps have millisecond resolution; keep ordered inserts distinct.
async fn tick() {
    tokio::time::sleep(Duration::from_millis(5)).await;
}

#[tokio::test]
async fn group_history_excludes_private_messages() {
    let (pool, _tmp) = setup_pool().await;
    let alice = create_user(&pool, "alice", UserRole::CaseManager).await;
    let bob = create_user(&pool, "bob", UserRole::CaseManager).await;

    Message::create(&pool, alice.id, None, "hello everyone").await.unwrap();
    Message::create(&pool, alice.id, Some(bob.id), "just for bob").await.unwrap();

    let group = Message::find_group_recent(&pool, 50).await.unwrap();
    assert_eq!(group.len(), 1);
    assert_eq!(group[0].content, "hello everyone");
    assert_eq!(group[0].recipient_id, None);
}

#[tokio::test]
async fn group_since_returns_only_newer_messages() {
    let (pool, _tmp) = setup_pool().await;
    let alice = create_user(&pool, "alice", UserRole::CaseManager).await;

    let first = Message::create(&pool, alice.id, None, "first").await.unwrap();
    tick().await;
    let _second = Message::create(&pool, alice.id, None, "second").await.unwrap();

    let newer = Message::find_group_since(&pool, first.created_at).await.unwrap();
    assert_eq!(newer.len(), 1);
    assert_eq!(newer[0].content, "second");
}

#[tokio::test]
async fn pair_history_sees_both_directions_only() {
    let (pool, _tmp) = setup_pool().await;
    let alice = create_user(&pool, "alice", UserRole::CaseManager).await;
    let bob = create_user(&pool, "bob", UserRole::CaseManager).await;
    let carol = create_user(&pool, "carol", UserRole::CaseManager).await;

    Message::create(&pool, alice.id, Some(bob.id), "a to b").await.unwrap();
    Message::create(&pool, bob.id, Some(alice.id), "b to a").await.unwrap();
    Message::create(&pool, carol.id, Some(alice.id), "c to a").await.unwrap();

    let history = Message::find_pair_history(&pool, alice.id, bob.id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().all(|m| {
        (m.user_id == alice.id && m.recipient_id == Some(bob.id))
            || (m.user_id == bob.id && m.recipient_id == Some(alice.id))
    }));
}

#[tokio::test]
async fn conversations_list_counterparts_with_last_message() {
    let (pool, _tmp) = setup_pool().await;
    let alice = create_user(&pool, "alice", UserRole::CaseManager).await;
    let bob = create_user(&pool, "bob", UserRole::CaseManager).await;
    let carol = create_user(&pool, "carol", UserRole::CaseManager).await;

    Message::create(&pool, alice.id, Some(bob.id), "hi bob").await.unwrap();
    tick().await;
    Message::create(&pool, bob.id, Some(alice.id), "hi alice").await.unwrap();
    tick().await;
    Message::create(&pool, carol.id, Some(alice.id), "hi from carol").await.unwrap();
    tick().await;
    Message::create(&pool, alice.id, None, "group noise").await.unwrap();

    let conversations = Message::find_conversations(&pool, alice.id).await.unwrap();
    assert_eq!(conversations.len(), 2);

    // Most recent conversation first.
    assert_eq!(conversations[0].user_id, carol.id);
    assert_eq!(conversations[0].last_message, "hi from carol");
    assert_eq!(conversations[1].user_id, bob.id);
    assert_eq!(conversations[1].last_message, "hi alice");
}

#[tokio::test]
async fn unread_counts_are_per_sender() {
    let (pool, _tmp) = setup_pool().await;
    let alice = create_user(&pool, "alice", UserRole::CaseManager).await;
    let bob = create_user(&pool, "bob", UserRole::CaseManager).await;

    Message::create(&pool, bob.id, Some(alice.id), "one").await.unwrap();
    Message::create(&pool, bob.id, Some(alice.id), "two").await.unwrap();
    Message::create(&pool, alice.id, Some(bob.id), "reply").await.unwrap();

    assert_eq!(Message::count_from_sender(&pool, bob.id, alice.id).await.unwrap(), 2);
    assert_eq!(Message::count_from_sender(&pool, alice.id, bob.id).await.unwrap(), 1);
}
