use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{delete, get, post},
};
use db::models::{
    musician::Musician,
    notification::{CreateNotification, Notification, NotificationType},
    practice::{
        AddPracticeSong, AssignPracticeMusician, CreatePractice, Practice, PracticeMusician,
        PracticeSong, UpdatePractice,
    },
    user::User,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::load_practice_middleware};

fn require_coordinator(user: &User) -> Result<(), ApiError> {
    if user.is_coordinator() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You don't have permission to manage practices".to_string(),
        ))
    }
}

#[derive(Debug, Serialize, TS)]
pub struct PracticeDetail {
    pub practice: Practice,
    pub musicians: Vec<PracticeMusician>,
    pub songs: Vec<PracticeSong>,
}

/// GET /api/practices - All practices, newest date first
pub async fn get_practices(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Practice>>>, ApiError> {
    let practices = Practice::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(practices)))
}

/// POST /api/practices - Create a practice (coordinator)
pub async fn create_practice(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Json(payload): Json<CreatePractice>,
) -> Result<ResponseJson<ApiResponse<Practice>>, ApiError> {
    require_coordinator(&current)?;
    let practice = Practice::create(&state.db().pool, &payload, current.id).await?;
    Ok(ResponseJson(ApiResponse::success(practice)))
}

/// POST /api/practices/delete-all - Wipe every practice (admin)
pub async fn delete_all_practices(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
) -> Result<ResponseJson<ApiResponse<u64>>, ApiError> {
    if !current.is_admin() {
        return Err(ApiError::Forbidden(
            "Administrator access required".to_string(),
        ));
    }
    let count = Practice::delete_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success_with_message(
        count,
        format!("Deleted {count} practice(s)."),
    )))
}

/// GET /api/practices/{id} - Practice with band and ordered lineup
pub async fn get_practice(
    Extension(practice): Extension<Practice>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<PracticeDetail>>, ApiError> {
    let pool = &state.db().pool;
    let musicians = PracticeMusician::find_for_practice(pool, practice.id).await?;
    let songs = PracticeSong::find_for_practice(pool, practice.id).await?;
    Ok(ResponseJson(ApiResponse::success(PracticeDetail {
        practice,
        musicians,
        songs,
    })))
}

/// PUT /api/practices/{id} - Update a practice (coordinator)
pub async fn update_practice(
    Extension(practice): Extension<Practice>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
    Json(payload): Json<UpdatePractice>,
) -> Result<ResponseJson<ApiResponse<Practice>>, ApiError> {
    require_coordinator(&current)?;
    let updated = Practice::update(&state.db().pool, practice.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

/// DELETE /api/practices/{id}
pub async fn delete_practice(
    Extension(practice): Extension<Practice>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    require_coordinator(&current)?;
    Practice::delete(&state.db().pool, practice.id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

/// POST /api/practices/{id}/musicians - Assign a musician and notify them
pub async fn add_practice_musician(
    Extension(practice): Extension<Practice>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
    Json(payload): Json<AssignPracticeMusician>,
) -> Result<ResponseJson<ApiResponse<PracticeMusician>>, ApiError> {
    require_coordinator(&current)?;
    let pool = &state.db().pool;
    let assignment = PracticeMusician::create(pool, practice.id, &payload).await?;

    // In-app heads-up for the assigned member, unless they assigned themselves.
    if let Some(musician) = Musician::find_by_id(pool, payload.musician_id).await?
        && let Some(user_id) = musician.user_id
        && user_id != current.id
    {
        Notification::create(
            pool,
            &CreateNotification::new(user_id, NotificationType::Practice, current.id)
                .practice(practice.id),
        )
        .await?;
    }

    Ok(ResponseJson(ApiResponse::success(assignment)))
}

/// DELETE /api/practices/{id}/musicians/{assignment_id}
pub async fn delete_practice_musician(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Path((_practice_id, assignment_id)): Path<(Uuid, Uuid)>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    require_coordinator(&current)?;
    let rows_affected = PracticeMusician::delete(&state.db().pool, assignment_id).await?;
    if rows_affected == 0 {
        Err(ApiError::Database(sqlx::Error::RowNotFound))
    } else {
        Ok(ResponseJson(ApiResponse::success(())))
    }
}

#[derive(Debug, Deserialize, TS)]
pub struct AddPracticeSongs {
    pub songs: Vec<AddPracticeSong>,
}

/// POST /api/practices/{id}/songs - Append one or more lineup rows in order
pub async fn add_practice_songs(
    Extension(practice): Extension<Practice>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
    Json(payload): Json<AddPracticeSongs>,
) -> Result<ResponseJson<ApiResponse<Vec<PracticeSong>>>, ApiError> {
    require_coordinator(&current)?;
    let pool = &state.db().pool;

    let mut added = Vec::with_capacity(payload.songs.len());
    for entry in &payload.songs {
        if entry.song_id.is_none()
            && entry.song_name.as_deref().map(str::trim).unwrap_or("").is_empty()
        {
            return Err(ApiError::BadRequest(
                "Each lineup entry needs a song or a song name".to_string(),
            ));
        }
        added.push(PracticeSong::append(pool, practice.id, entry).await?);
    }

    Ok(ResponseJson(ApiResponse::success(added)))
}

/// DELETE /api/practices/{id}/songs/{song_row_id} - Remove a lineup row
pub async fn remove_practice_song(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Path((_practice_id, song_row_id)): Path<(Uuid, Uuid)>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    require_coordinator(&current)?;
    let rows_affected = PracticeSong::delete(&state.db().pool, song_row_id).await?;
    if rows_affected == 0 {
        Err(ApiError::Database(sqlx::Error::RowNotFound))
    } else {
        Ok(ResponseJson(ApiResponse::success(())))
    }
}

pub fn router(state: &AppState) -> Router<AppState> {
    let practice_router = Router::new()
        .route(
            "/",
            get(get_practice).put(update_practice).delete(delete_practice),
        )
        .route("/musicians", post(add_practice_musician))
        .route("/songs", post(add_practice_songs))
        .layer(from_fn_with_state(state.clone(), load_practice_middleware))
        // Two path params, so these skip the loader middleware.
        .route("/musicians/{assignment_id}", delete(delete_practice_musician))
        .route("/songs/{song_row_id}", delete(remove_practice_song));

    let inner = Router::new()
        .route("/", get(get_practices).post(create_practice))
        .route("/delete-all", post(delete_all_practices))
        .nest("/{practice_id}", practice_router);

    Router::new().nest("/practices", inner)
}
