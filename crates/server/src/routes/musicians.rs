use axum::{
    Extension, Json, Router,
    extract::{Multipart, State},
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{get, post, put},
};
use db::models::{
    musician::{Musician, UpdateCustomization, UpdateMusician},
    post::ProfilePost,
    user::User,
};
use serde::Serialize;
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError, middleware::load_musician_middleware, uploads};

#[derive(Debug, Serialize, TS)]
pub struct MusicianProfile {
    pub musician: Musician,
    pub posts: Vec<ProfilePost>,
    pub is_own: bool,
}

/// GET /api/musicians - List all team member profiles
pub async fn get_musicians(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Musician>>>, ApiError> {
    let musicians = Musician::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(musicians)))
}

/// GET /api/musicians/{id} - Profile with wall posts; bumps the view
/// counter when someone else is looking
pub async fn get_musician(
    Extension(musician): Extension<Musician>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<MusicianProfile>>, ApiError> {
    let pool = &state.db().pool;
    let is_own = musician.user_id == Some(current.id);
    if !is_own {
        Musician::increment_profile_views(pool, musician.id).await?;
    }
    let posts = ProfilePost::find_for_musician(pool, musician.id).await?;
    Ok(ResponseJson(ApiResponse::success(MusicianProfile {
        musician,
        posts,
        is_own,
    })))
}

/// GET /api/profile - The current user's own profile, created on first use
pub async fn my_profile(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
) -> Result<ResponseJson<ApiResponse<Musician>>, ApiError> {
    let (musician, _created) =
        Musician::find_or_create_for_user(&state.db().pool, current.id, current.display_name())
            .await?;
    Ok(ResponseJson(ApiResponse::success(musician)))
}

fn can_edit(musician: &Musician, user: &User) -> bool {
    user.is_admin() || musician.user_id == Some(user.id)
}

/// PUT /api/musicians/{id} - Update profile fields
pub async fn update_musician(
    Extension(musician): Extension<Musician>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateMusician>,
) -> Result<ResponseJson<ApiResponse<Musician>>, ApiError> {
    if !can_edit(&musician, &current) {
        return Err(ApiError::Forbidden(
            "You can only edit your own profile".to_string(),
        ));
    }
    let updated = Musician::update(&state.db().pool, musician.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

/// PUT /api/musicians/{id}/customize - Update customization fields
pub async fn customize_musician(
    Extension(musician): Extension<Musician>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateCustomization>,
) -> Result<ResponseJson<ApiResponse<Musician>>, ApiError> {
    if !can_edit(&musician, &current) {
        return Err(ApiError::Forbidden(
            "You can only customize your own profile".to_string(),
        ));
    }
    let updated = Musician::update_customization(&state.db().pool, musician.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

/// POST /api/musicians/{id}/picture - Upload a profile picture or banner.
/// Multipart fields named `picture` or `banner`.
pub async fn upload_picture(
    Extension(musician): Extension<Musician>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<ResponseJson<ApiResponse<Musician>>, ApiError> {
    if !can_edit(&musician, &current) {
        return Err(ApiError::Forbidden(
            "You can only edit your own profile".to_string(),
        ));
    }

    let pool = &state.db().pool;
    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("picture") => {
                let path = uploads::save_field(field, "profiles/pictures").await?;
                if let Some(old) = &musician.profile_picture {
                    uploads::remove_stored(old).await;
                }
                Musician::set_profile_picture(pool, musician.id, Some(&path)).await?;
            }
            Some("banner") => {
                let path = uploads::save_field(field, "profiles/banners").await?;
                if let Some(old) = &musician.banner {
                    uploads::remove_stored(old).await;
                }
                Musician::set_banner(pool, musician.id, Some(&path)).await?;
            }
            _ => continue,
        }
    }

    let updated = Musician::find_by_id(pool, musician.id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

/// POST /api/musicians/{id}/picture/delete - Clear the profile picture
pub async fn delete_picture(
    Extension(musician): Extension<Musician>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    if !can_edit(&musician, &current) {
        return Err(ApiError::Forbidden(
            "You can only edit your own profile".to_string(),
        ));
    }
    if let Some(old) = &musician.profile_picture {
        uploads::remove_stored(old).await;
    }
    Musician::set_profile_picture(&state.db().pool, musician.id, None).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

/// POST /api/musicians/{id}/banner/delete - Clear the banner image
pub async fn delete_banner(
    Extension(musician): Extension<Musician>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    if !can_edit(&musician, &current) {
        return Err(ApiError::Forbidden(
            "You can only edit your own profile".to_string(),
        ));
    }
    if let Some(old) = &musician.banner {
        uploads::remove_stored(old).await;
    }
    Musician::set_banner(&state.db().pool, musician.id, None).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

/// DELETE /api/musicians/{id} - Remove a profile (admin)
pub async fn delete_musician(
    Extension(musician): Extension<Musician>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    if !current.is_admin() {
        return Err(ApiError::Forbidden(
            "Administrator access required".to_string(),
        ));
    }
    let rows_affected = Musician::delete(&state.db().pool, musician.id).await?;
    if rows_affected == 0 {
        Err(ApiError::Database(sqlx::Error::RowNotFound))
    } else {
        Ok(ResponseJson(ApiResponse::success(())))
    }
}

pub fn router(state: &AppState) -> Router<AppState> {
    let musician_router = Router::new()
        .route(
            "/",
            get(get_musician).put(update_musician).delete(delete_musician),
        )
        .route("/customize", put(customize_musician))
        .route("/picture", post(upload_picture))
        .route("/picture/delete", post(delete_picture))
        .route("/banner/delete", post(delete_banner))
        .layer(from_fn_with_state(state.clone(), load_musician_middleware));

    let inner = Router::new()
        .route("/", get(get_musicians))
        .nest("/{musician_id}", musician_router);

    Router::new()
        .nest("/musicians", inner)
        .route("/profile", get(my_profile))
}
