use axum::{
    Extension, Json, Router,
    extract::State,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{get, post, put},
};
use db::models::{
    musician::Musician,
    notification::{CreateNotification, Notification, NotificationType},
    post::{CreatePost, PostComment, ProfilePost, ReactionState, UpdatePost},
    user::User,
};
use serde::Deserialize;
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{
    AppState,
    error::ApiError,
    middleware::{load_musician_middleware, load_post_middleware},
};

/// Notify the owner of a post about an action, skipping self-notifications.
async fn notify_post_owner(
    state: &AppState,
    post: &ProfilePost,
    actor: &User,
    notification_type: NotificationType,
) -> Result<(), ApiError> {
    let pool = &state.db().pool;
    let Some(owner) = Musician::find_by_id(pool, post.musician_id).await? else {
        return Ok(());
    };
    if let Some(owner_user_id) = owner.user_id
        && owner_user_id != actor.id
    {
        Notification::create(
            pool,
            &CreateNotification::new(owner_user_id, notification_type, actor.id).post(post.id),
        )
        .await?;
    }
    Ok(())
}

/// POST /api/musicians/{id}/posts - Post on a wall (owner only)
pub async fn create_post(
    Extension(musician): Extension<Musician>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
    Json(payload): Json<CreatePost>,
) -> Result<ResponseJson<ApiResponse<ProfilePost>>, ApiError> {
    if musician.user_id != Some(current.id) {
        return Err(ApiError::Forbidden(
            "You can only post on your own wall".to_string(),
        ));
    }
    if payload.content.as_deref().map(str::trim).unwrap_or("").is_empty()
        && payload.image_path.is_none()
        && payload.video_path.is_none()
    {
        return Err(ApiError::BadRequest(
            "A post needs text or media".to_string(),
        ));
    }
    let created = ProfilePost::create(&state.db().pool, musician.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(created)))
}

async fn owns_post(state: &AppState, post: &ProfilePost, user: &User) -> Result<bool, ApiError> {
    let owner = Musician::find_by_id(&state.db().pool, post.musician_id).await?;
    Ok(owner.and_then(|m| m.user_id) == Some(user.id))
}

/// PUT /api/posts/{id} - Edit a post (owner only)
pub async fn update_post(
    Extension(post): Extension<ProfilePost>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
    Json(payload): Json<UpdatePost>,
) -> Result<ResponseJson<ApiResponse<ProfilePost>>, ApiError> {
    if !owns_post(&state, &post, &current).await? {
        return Err(ApiError::Forbidden(
            "You can only edit your own posts".to_string(),
        ));
    }
    let updated =
        ProfilePost::update_content(&state.db().pool, post.id, payload.content.as_deref()).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

/// DELETE /api/posts/{id} - Delete a post (owner or admin)
pub async fn delete_post(
    Extension(post): Extension<ProfilePost>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    if !current.is_admin() && !owns_post(&state, &post, &current).await? {
        return Err(ApiError::Forbidden(
            "You can only delete your own posts".to_string(),
        ));
    }
    ProfilePost::delete(&state.db().pool, post.id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

/// POST /api/posts/{id}/like - Toggle like, clearing any heart
pub async fn toggle_like(
    Extension(post): Extension<ProfilePost>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<ReactionState>>, ApiError> {
    let reaction = ProfilePost::toggle_like(&state.db().pool, post.id, current.id).await?;
    if reaction.action == "liked" {
        notify_post_owner(&state, &post, &current, NotificationType::Like).await?;
    }
    Ok(ResponseJson(ApiResponse::success(reaction)))
}

/// POST /api/posts/{id}/heart - Toggle heart, clearing any like
pub async fn toggle_heart(
    Extension(post): Extension<ProfilePost>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<ReactionState>>, ApiError> {
    let reaction = ProfilePost::toggle_heart(&state.db().pool, post.id, current.id).await?;
    if reaction.action == "hearted" {
        notify_post_owner(&state, &post, &current, NotificationType::Heart).await?;
    }
    Ok(ResponseJson(ApiResponse::success(reaction)))
}

#[derive(Debug, Deserialize, TS)]
pub struct SharePost {
    pub content: String,
}

/// POST /api/posts/{id}/share - Repost onto the sharer's wall with edited
/// content. One share per user per post.
pub async fn share_post(
    Extension(post): Extension<ProfilePost>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
    Json(payload): Json<SharePost>,
) -> Result<ResponseJson<ApiResponse<ProfilePost>>, ApiError> {
    let content = payload.content.trim();
    if content.is_empty() {
        return Err(ApiError::BadRequest(
            "Please add some content before sharing".to_string(),
        ));
    }

    let pool = &state.db().pool;
    if !ProfilePost::record_repost(pool, post.id, current.id).await? {
        return Err(ApiError::BadRequest(
            "You have already shared this post".to_string(),
        ));
    }

    let (own_profile, _) =
        Musician::find_or_create_for_user(pool, current.id, current.display_name()).await?;

    let shared = ProfilePost::create(
        pool,
        own_profile.id,
        &CreatePost {
            content: Some(content.to_string()),
            image_path: post.image_path.clone(),
            video_path: post.video_path.clone(),
        },
    )
    .await?;

    notify_post_owner(&state, &post, &current, NotificationType::Share).await?;
    Ok(ResponseJson(ApiResponse::success(shared)))
}

#[derive(Debug, Deserialize, TS)]
pub struct AddComment {
    pub content: String,
}

/// GET /api/posts/{id}/comments - Comments, oldest first
pub async fn get_comments(
    Extension(post): Extension<ProfilePost>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<PostComment>>>, ApiError> {
    let comments = PostComment::find_for_post(&state.db().pool, post.id).await?;
    Ok(ResponseJson(ApiResponse::success(comments)))
}

/// POST /api/posts/{id}/comments - Add a comment
pub async fn add_comment(
    Extension(post): Extension<ProfilePost>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
    Json(payload): Json<AddComment>,
) -> Result<ResponseJson<ApiResponse<PostComment>>, ApiError> {
    let content = payload.content.trim();
    if content.is_empty() {
        return Err(ApiError::BadRequest("Comment cannot be empty".to_string()));
    }
    let comment = PostComment::create(&state.db().pool, post.id, current.id, content).await?;
    notify_post_owner(&state, &post, &current, NotificationType::Comment).await?;
    Ok(ResponseJson(ApiResponse::success(comment)))
}

/// DELETE /api/comments/{id} - Delete own comment (admin may delete any)
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    axum::extract::Path(comment_id): axum::extract::Path<uuid::Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &state.db().pool;
    let comment = PostComment::find_by_id(pool, comment_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))?;
    if comment.user_id != current.id && !current.is_admin() {
        return Err(ApiError::Forbidden(
            "You can only delete your own comments".to_string(),
        ));
    }
    PostComment::delete(pool, comment.id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let wall_router = Router::new()
        .route("/posts", post(create_post))
        .layer(from_fn_with_state(state.clone(), load_musician_middleware));

    let post_router = Router::new()
        .route("/", put(update_post).delete(delete_post))
        .route("/like", post(toggle_like))
        .route("/heart", post(toggle_heart))
        .route("/share", post(share_post))
        .route("/comments", get(get_comments).post(add_comment))
        .layer(from_fn_with_state(state.clone(), load_post_middleware));

    Router::new()
        .nest("/musicians/{musician_id}", wall_router)
        .nest("/posts/{post_id}", post_router)
        .route("/comments/{comment_id}", axum::routing::delete(delete_comment))
}
