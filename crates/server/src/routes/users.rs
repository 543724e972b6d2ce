use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    response::Json as ResponseJson,
    routing::{delete, get, post},
};
use db::models::{
    user::{CreateUser, UpdateUser, User, UserError},
    user_permission::{GrantPermission, UserPermission},
};
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

fn require_admin(user: &User) -> Result<(), ApiError> {
    if user.is_admin() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Administrator access required".to_string(),
        ))
    }
}

/// GET /api/users - List users (admin)
pub async fn get_users(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
) -> Result<ResponseJson<ApiResponse<Vec<User>>>, ApiError> {
    require_admin(&current)?;
    let users = User::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(users)))
}

/// POST /api/users - Create a user (admin)
pub async fn create_user(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Json(payload): Json<CreateUser>,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    require_admin(&current)?;
    let user = User::create(&state.db().pool, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(user)))
}

/// PUT /api/users/{id} - Update a user (admin)
pub async fn update_user(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUser>,
) -> Result<ResponseJson<ApiResponse<User>>, ApiError> {
    require_admin(&current)?;
    let user = User::update(&state.db().pool, id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(user)))
}

/// DELETE /api/users/{id} - Delete a user (admin), reassigning owned records
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    require_admin(&current)?;
    let pool = &state.db().pool;

    let user = User::find_by_id(pool, id)
        .await?
        .ok_or(UserError::UserNotFound)?;

    if user.id == current.id {
        return Err(UserError::SelfDelete.into());
    }
    if user.is_admin() && User::count_leaders(pool).await? == 1 {
        return Err(UserError::LastAdmin.into());
    }

    // Records the user owns survive under another leader.
    let fallback_admin = if current.is_admin() && current.id != user.id {
        current.id
    } else {
        User::find_leaders(pool)
            .await?
            .into_iter()
            .map(|u| u.id)
            .find(|leader_id| *leader_id != user.id)
            .unwrap_or(current.id)
    };

    User::delete_with_reassignment(pool, user.id, fallback_admin).await?;
    Ok(ResponseJson(ApiResponse::success_with_message(
        (),
        "User deleted successfully. All related records have been handled.",
    )))
}

/// GET /api/users/{id}/permissions - List a user's permission grants (admin)
pub async fn get_permissions(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Vec<UserPermission>>>, ApiError> {
    require_admin(&current)?;
    let permissions = UserPermission::find_for_user(&state.db().pool, id).await?;
    Ok(ResponseJson(ApiResponse::success(permissions)))
}

/// POST /api/permissions - Grant a permission (admin)
pub async fn grant_permission(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Json(payload): Json<GrantPermission>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    require_admin(&current)?;
    UserPermission::grant(&state.db().pool, &payload, current.id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

/// DELETE /api/users/{id}/permissions/{permission_type} - Revoke (admin)
pub async fn revoke_permission(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Path((id, permission_type)): Path<(Uuid, String)>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    require_admin(&current)?;
    UserPermission::revoke(&state.db().pool, id, &permission_type).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/users", get(get_users).post(create_user))
        .route("/users/{id}", axum::routing::put(update_user).delete(delete_user))
        .route("/users/{id}/permissions", get(get_permissions))
        .route(
            "/users/{id}/permissions/{permission_type}",
            delete(revoke_permission),
        )
        .route("/permissions", post(grant_permission))
}
