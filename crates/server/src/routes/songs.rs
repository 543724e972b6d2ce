use axum::{
    Extension, Json, Router,
    extract::State,
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::get,
};
use db::models::{
    song::{CreateSong, Song, UpdateSong},
    user::User,
};
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError, middleware::load_song_middleware};

fn require_coordinator(user: &User) -> Result<(), ApiError> {
    if user.is_coordinator() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You don't have permission to manage songs".to_string(),
        ))
    }
}

/// GET /api/songs - Song library, alphabetical
pub async fn get_songs(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Song>>>, ApiError> {
    let songs = Song::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(songs)))
}

/// POST /api/songs - Add a song (coordinator)
pub async fn create_song(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Json(payload): Json<CreateSong>,
) -> Result<ResponseJson<ApiResponse<Song>>, ApiError> {
    require_coordinator(&current)?;
    let song = Song::create(&state.db().pool, &payload, current.id).await?;
    Ok(ResponseJson(ApiResponse::success(song)))
}

/// GET /api/songs/{id}
pub async fn get_song(
    Extension(song): Extension<Song>,
) -> Result<ResponseJson<ApiResponse<Song>>, ApiError> {
    Ok(ResponseJson(ApiResponse::success(song)))
}

/// PUT /api/songs/{id} - Update a song (coordinator)
pub async fn update_song(
    Extension(song): Extension<Song>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateSong>,
) -> Result<ResponseJson<ApiResponse<Song>>, ApiError> {
    require_coordinator(&current)?;
    let updated = Song::update(&state.db().pool, song.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

/// DELETE /api/songs/{id} - Remove a song (coordinator)
pub async fn delete_song(
    Extension(song): Extension<Song>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    require_coordinator(&current)?;
    let rows_affected = Song::delete(&state.db().pool, song.id).await?;
    if rows_affected == 0 {
        Err(ApiError::Database(sqlx::Error::RowNotFound))
    } else {
        Ok(ResponseJson(ApiResponse::success(())))
    }
}

pub fn router(state: &AppState) -> Router<AppState> {
    let song_router = Router::new()
        .route("/", get(get_song).put(update_song).delete(delete_song))
        .layer(from_fn_with_state(state.clone(), load_song_middleware));

    let inner = Router::new()
        .route("/", get(get_songs).post(create_song))
        .nest("/{song_id}", song_router);

    Router::new().nest("/songs", inner)
}
