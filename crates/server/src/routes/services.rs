use axum::{
    Extension, Json, Router,
    extract::{Path, State},
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{delete, get, post},
};
use db::models::{
    service::{AssignServiceMusician, CreateService, ServiceMusician, SundayService, UpdateService},
    user::User,
};
use serde::Serialize;
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError, middleware::load_service_middleware};

fn require_coordinator(user: &User) -> Result<(), ApiError> {
    if user.is_coordinator() {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "You don't have permission to manage services".to_string(),
        ))
    }
}

#[derive(Debug, Serialize, TS)]
pub struct ServiceDetail {
    pub service: SundayService,
    pub musicians: Vec<ServiceMusician>,
}

/// GET /api/services - All services, newest date first
pub async fn get_services(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<SundayService>>>, ApiError> {
    let services = SundayService::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(services)))
}

/// POST /api/services - Create a service (coordinator)
pub async fn create_service(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Json(payload): Json<CreateService>,
) -> Result<ResponseJson<ApiResponse<SundayService>>, ApiError> {
    require_coordinator(&current)?;
    let service = SundayService::create(&state.db().pool, &payload, current.id).await?;
    Ok(ResponseJson(ApiResponse::success(service)))
}

/// GET /api/services/{id} - Service with its assignments
pub async fn get_service(
    Extension(service): Extension<SundayService>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<ServiceDetail>>, ApiError> {
    let musicians = ServiceMusician::find_for_service(&state.db().pool, service.id).await?;
    Ok(ResponseJson(ApiResponse::success(ServiceDetail {
        service,
        musicians,
    })))
}

/// PUT /api/services/{id} - Update a service (coordinator)
pub async fn update_service(
    Extension(service): Extension<SundayService>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateService>,
) -> Result<ResponseJson<ApiResponse<SundayService>>, ApiError> {
    require_coordinator(&current)?;
    let updated = SundayService::update(&state.db().pool, service.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

/// DELETE /api/services/{id} - Delete a service and its assignments
pub async fn delete_service(
    Extension(service): Extension<SundayService>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    require_coordinator(&current)?;
    SundayService::delete(&state.db().pool, service.id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

/// POST /api/services/{id}/musicians - Assign a musician (coordinator)
pub async fn add_service_musician(
    Extension(service): Extension<SundayService>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
    Json(payload): Json<AssignServiceMusician>,
) -> Result<ResponseJson<ApiResponse<ServiceMusician>>, ApiError> {
    require_coordinator(&current)?;
    let assignment = ServiceMusician::create(&state.db().pool, service.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(assignment)))
}

/// DELETE /api/services/{id}/musicians/{assignment_id}
pub async fn delete_service_musician(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Path((_service_id, assignment_id)): Path<(Uuid, Uuid)>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    require_coordinator(&current)?;
    let rows_affected = ServiceMusician::delete(&state.db().pool, assignment_id).await?;
    if rows_affected == 0 {
        Err(ApiError::Database(sqlx::Error::RowNotFound))
    } else {
        Ok(ResponseJson(ApiResponse::success(())))
    }
}

pub fn router(state: &AppState) -> Router<AppState> {
    let service_router = Router::new()
        .route(
            "/",
            get(get_service).put(update_service).delete(delete_service),
        )
        .route("/musicians", post(add_service_musician))
        .layer(from_fn_with_state(state.clone(), load_service_middleware))
        // Two path params, so this one skips the loader middleware.
        .route("/musicians/{assignment_id}", delete(delete_service_musician));

    let inner = Router::new()
        .route("/", get(get_services).post(create_service))
        .nest("/{service_id}", service_router);

    Router::new().nest("/services", inner)
}
