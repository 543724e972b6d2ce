//! A user holds at most one reaction per post: adding a like clears their
//! heart and vice versa, and repeating a reaction removes it.

mod common;

use common::{create_musician_for, create_user, setup_pool};
use db::models::{
    post::{CreatePost, ProfilePost},
    user::UserRole,
};
use sqlx::SqlitePool;
use uuid::Uuid;

async fn make_post(pool: &SqlitePool) -> Uuid {
    let owner = create_user(pool, "owner", UserRole::CaseManager).await;
    let musician_id = create_musician_for(pool, &owner).await;
    ProfilePost::create(
        pool,
        musician_id,
        &CreatePost {
            content: Some("hello wall".to_string()),
            image_path: None,
            video_path: None,
        },
    )
    .await
    .expect("Failed to create post")
    .id
}

#[tokio::test]
async fn like_then_unlike() {
    let (pool, _tmp) = setup_pool().await;
    let post_id = make_post(&pool).await;
    let reader = create_user(&pool, "reader", UserRole::CaseManager).await;

    let state = ProfilePost::toggle_like(&pool, post_id, reader.id).await.unwrap();
    assert_eq!(state.action, "liked");
    assert_eq!(state.like_count, 1);
    assert!(state.has_like);
    assert!(!state.has_heart);

    let state = ProfilePost::toggle_like(&pool, post_id, reader.id).await.unwrap();
    assert_eq!(state.action, "unliked");
    assert_eq!(state.like_count, 0);
    assert!(!state.has_like);
}

#[tokio::test]
async fn liking_a_hearted_post_swaps_the_reaction() {
    let (pool, _tmp) = setup_pool().await;
    let post_id = make_post(&pool).await;
    let reader = create_user(&pool, "reader", UserRole::CaseManager).await;

    let state = ProfilePost::toggle_heart(&pool, post_id, reader.id).await.unwrap();
    assert_eq!(state.action, "hearted");
    assert_eq!(state.heart_count, 1);

    let state = ProfilePost::toggle_like(&pool, post_id, reader.id).await.unwrap();
    assert_eq!(state.action, "liked");
    assert_eq!(state.like_count, 1);
    assert_eq!(state.heart_count, 0, "heart must be removed when liking");
    assert!(state.has_like);
    assert!(!state.has_heart);
}

#[tokio::test]
async fn hearting_a_liked_post_swaps_the_reaction() {
    let (pool, _tmp) = setup_pool().await;
    let post_id = make_post(&pool).await;
    let reader = create_user(&pool, "reader", UserRole::CaseManager).await;

    ProfilePost::toggle_like(&pool, post_id, reader.id).await.unwrap();
    let state = ProfilePost::toggle_heart(&pool, post_id, reader.id).await.unwrap();

    assert_eq!(state.action, "hearted");
    assert_eq!(state.like_count, 0, "like must be removed when hearting");
    assert_eq!(state.heart_count, 1);
}

#[tokio::test]
async fn reactions_are_per_user() {
    let (pool, _tmp) = setup_pool().await;
    let post_id = make_post(&pool).await;
    let alice = create_user(&pool, "alice", UserRole::CaseManager).await;
    let bob = create_user(&pool, "bob", UserRole::CaseManager).await;

    ProfilePost::toggle_like(&pool, post_id, alice.id).await.unwrap();
    let state = ProfilePost::toggle_heart(&pool, post_id, bob.id).await.unwrap();

    // Bob's heart must not disturb Alice's like.
    assert_eq!(state.like_count, 1);
    assert_eq!(state.heart_count, 1);
    assert!(!state.has_like, "bob has no like of his own");
    assert!(state.has_heart);
}

#[tokio::test]
async fn second_share_is_rejected() {
    let (pool, _tmp) = setup_pool().await;
    let post_id = make_post(&pool).await;
    let reader = create_user(&pool, "reader", UserRole::CaseManager).await;

    assert!(ProfilePost::record_repost(&pool, post_id, reader.id).await.unwrap());
    assert!(!ProfilePost::record_repost(&pool, post_id, reader.id).await.unwrap());
    assert!(ProfilePost::has_reposted(&pool, post_id, reader.id).await.unwrap());
}
