use axum::{
    Extension, Json, Router,
    body::Body,
    extract::{Multipart, Query, State},
    http::header,
    middleware::from_fn_with_state,
    response::{IntoResponse, Json as ResponseJson, Response},
    routing::get,
};
use db::models::{
    activity::{ActivityLog, ActivityType, RecordActivity},
    slide::{CreateSlide, Slide, SlideFileType, SlideLanguage, UpdateSlide},
    user::User,
};
use serde::Deserialize;
use ts_rs::TS;
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError, middleware::load_slide_middleware, uploads};

#[derive(Debug, Deserialize, TS)]
pub struct SlideQueryParams {
    #[serde(default)]
    pub language: Option<SlideLanguage>,
}

/// GET /api/slides - Job-aid library, optionally filtered by language
pub async fn get_slides(
    State(state): State<AppState>,
    Query(params): Query<SlideQueryParams>,
) -> Result<ResponseJson<ApiResponse<Vec<Slide>>>, ApiError> {
    let slides = Slide::find_all(&state.db().pool, params.language).await?;
    Ok(ResponseJson(ApiResponse::success(slides)))
}

/// POST /api/slides - Upload a job aid. Multipart: a `file` part plus a
/// `metadata` JSON part; the file type is detected from the extension.
pub async fn create_slide(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    mut multipart: Multipart,
) -> Result<ResponseJson<ApiResponse<Slide>>, ApiError> {
    let mut metadata: Option<CreateSlide> = None;
    let mut stored: Option<(String, SlideFileType)> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("metadata") => {
                let raw = field.text().await?;
                metadata = Some(
                    serde_json::from_str(&raw)
                        .map_err(|e| ApiError::BadRequest(format!("Invalid metadata: {e}")))?,
                );
            }
            Some("file") => {
                let file_type =
                    SlideFileType::from_filename(field.file_name().unwrap_or_default());
                let path = uploads::save_field(field, "slides").await?;
                stored = Some((path, file_type));
            }
            _ => continue,
        }
    }

    let metadata =
        metadata.ok_or_else(|| ApiError::BadRequest("Slide metadata is required".to_string()))?;
    let (file_path, file_type) = stored
        .map(|(p, t)| (Some(p), Some(t)))
        .unwrap_or((None, None));

    let pool = &state.db().pool;
    let slide = Slide::create(
        pool,
        &metadata,
        file_type,
        file_path.as_deref(),
        current.id,
    )
    .await?;

    let mut record = RecordActivity::new(
        ActivityType::JobAidUploaded,
        current.id,
        format!("{} uploaded a job aid: {}", current.display_name(), slide.title),
    );
    record.slide_id = Some(slide.id);
    if let Err(e) = ActivityLog::record(pool, &record).await {
        tracing::warn!(error = %e, "Failed to record job aid activity");
    }

    Ok(ResponseJson(ApiResponse::success(slide)))
}

/// GET /api/slides/{id}
pub async fn get_slide(
    Extension(slide): Extension<Slide>,
) -> Result<ResponseJson<ApiResponse<Slide>>, ApiError> {
    Ok(ResponseJson(ApiResponse::success(slide)))
}

/// PUT /api/slides/{id} - Update metadata
pub async fn update_slide(
    Extension(slide): Extension<Slide>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateSlide>,
) -> Result<ResponseJson<ApiResponse<Slide>>, ApiError> {
    let updated = Slide::update(&state.db().pool, slide.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

/// DELETE /api/slides/{id} - Remove the record and its stored file
pub async fn delete_slide(
    Extension(slide): Extension<Slide>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    if !current.is_admin() && slide.created_by != current.id {
        return Err(ApiError::Forbidden(
            "You can only delete job aids you uploaded".to_string(),
        ));
    }
    if let Some(path) = &slide.file_path {
        uploads::remove_stored(path).await;
    }
    Slide::delete(&state.db().pool, slide.id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

/// GET /api/slides/{id}/download - Stream the stored file back
pub async fn download_slide(Extension(slide): Extension<Slide>) -> Result<Response, ApiError> {
    let relative = slide
        .file_path
        .as_deref()
        .ok_or_else(|| ApiError::NotFound("This job aid has no file attached".to_string()))?;

    let path = utils::assets::asset_dir().join("uploads").join(relative);
    let file = tokio::fs::File::open(&path).await.map_err(|_| {
        ApiError::NotFound("The stored file is missing from disk".to_string())
    })?;

    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    let stream = tokio_util::io::ReaderStream::new(file);

    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "download".to_string());

    Ok((
        [
            (header::CONTENT_TYPE, mime.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}

pub fn router(state: &AppState) -> Router<AppState> {
    let slide_router = Router::new()
        .route("/", get(get_slide).put(update_slide).delete(delete_slide))
        .route("/download", get(download_slide))
        .layer(from_fn_with_state(state.clone(), load_slide_middleware));

    let inner = Router::new()
        .route("/", get(get_slides).post(create_slide))
        .nest("/{slide_id}", slide_router);

    Router::new().nest("/slides", inner)
}
