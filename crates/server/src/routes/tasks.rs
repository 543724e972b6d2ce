use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    response::Json as ResponseJson,
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use db::models::{
    task::{CreateTask, CreateTaskOption, Task, TaskOption},
    user::User,
};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use utils::response::ApiResponse;
use uuid::Uuid;

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize, TS)]
pub struct TaskQueryParams {
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, TS)]
pub struct TaskBoard {
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
    pub options: Vec<TaskOption>,
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// GET /api/tasks - The day's tasks plus saved templates
pub async fn get_tasks(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Query(params): Query<TaskQueryParams>,
) -> Result<ResponseJson<ApiResponse<TaskBoard>>, ApiError> {
    let pool = &state.db().pool;
    let date = params.date.unwrap_or_else(today);
    let tasks = Task::find_for_date(pool, current.id, date).await?;
    let options = TaskOption::find_for_user(pool, current.id).await?;
    Ok(ResponseJson(ApiResponse::success(TaskBoard {
        date,
        tasks,
        options,
    })))
}

/// POST /api/tasks - Add a task for a date (default today)
pub async fn add_task(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Json(payload): Json<CreateTask>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let text = payload.task.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("Task cannot be empty".to_string()));
    }
    let date = payload.task_date.unwrap_or_else(today);
    let task = Task::create(&state.db().pool, current.id, text, payload.priority, date).await?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

async fn owned_task(state: &AppState, id: Uuid, user: &User) -> Result<Task, ApiError> {
    let task = Task::find_by_id(&state.db().pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?;
    if task.user_id != user.id {
        return Err(ApiError::Forbidden(
            "You can only manage your own tasks".to_string(),
        ));
    }
    Ok(task)
}

/// POST /api/tasks/{id}/complete
pub async fn complete_task(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let task = owned_task(&state, id, &current).await?;
    let updated = Task::set_completed(&state.db().pool, task.id, true).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

/// POST /api/tasks/{id}/uncomplete
pub async fn uncomplete_task(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let task = owned_task(&state, id, &current).await?;
    let updated = Task::set_completed(&state.db().pool, task.id, false).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

/// DELETE /api/tasks/{id}
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let task = owned_task(&state, id, &current).await?;
    Task::delete(&state.db().pool, task.id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

/// POST /api/task-options - Save a task template
pub async fn add_task_option(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Json(payload): Json<CreateTaskOption>,
) -> Result<ResponseJson<ApiResponse<TaskOption>>, ApiError> {
    if payload.task_text.trim().is_empty() {
        return Err(ApiError::BadRequest("Task text cannot be empty".to_string()));
    }
    let option = TaskOption::create(&state.db().pool, current.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(option)))
}

/// DELETE /api/task-options/{id}
pub async fn delete_task_option(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    let pool = &state.db().pool;
    let option = TaskOption::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task option not found".to_string()))?;
    if option.user_id != current.id {
        return Err(ApiError::Forbidden(
            "You can only manage your own task options".to_string(),
        ));
    }
    TaskOption::delete(pool, option.id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

/// POST /api/task-options/{id}/use - Instantiate the template for today.
/// A duplicate of an existing task for today is rejected.
pub async fn use_task_option(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Path(id): Path<Uuid>,
) -> Result<ResponseJson<ApiResponse<Task>>, ApiError> {
    let pool = &state.db().pool;
    let option = TaskOption::find_by_id(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Task option not found".to_string()))?;
    if option.user_id != current.id {
        return Err(ApiError::Forbidden(
            "You can only use your own task options".to_string(),
        ));
    }

    let date = today();
    if Task::exists_for_date(pool, current.id, &option.task_text, date).await? {
        return Err(ApiError::BadRequest(
            "This task is already on today's list".to_string(),
        ));
    }

    let task = Task::create(pool, current.id, &option.task_text, option.priority, date).await?;
    Ok(ResponseJson(ApiResponse::success(task)))
}

/// GET /api/tasks/eod - Plain-text end-of-day report
pub async fn download_eod_tasks(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    Query(params): Query<TaskQueryParams>,
) -> Result<([(axum::http::HeaderName, String); 2], String), ApiError> {
    let date = params.date.unwrap_or_else(today);
    let tasks = Task::find_for_date(&state.db().pool, current.id, date).await?;

    let mut report = format!(
        "EOD Report - {} - {}\n\n",
        current.display_name(),
        date.format("%B %d, %Y")
    );
    let (done, open): (Vec<_>, Vec<_>) = tasks.iter().partition(|t| t.is_completed);
    report.push_str("Completed:\n");
    if done.is_empty() {
        report.push_str("  (none)\n");
    }
    for task in &done {
        report.push_str(&format!("  [x] {}\n", task.task));
    }
    report.push_str("\nOutstanding:\n");
    if open.is_empty() {
        report.push_str("  (none)\n");
    }
    for task in &open {
        report.push_str(&format!("  [ ] {}\n", task.task));
    }

    Ok((
        [
            (
                axum::http::header::CONTENT_TYPE,
                "text/plain; charset=utf-8".to_string(),
            ),
            (
                axum::http::header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"eod-{date}.txt\""),
            ),
        ],
        report,
    ))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tasks", get(get_tasks).post(add_task))
        .route("/tasks/eod", get(download_eod_tasks))
        .route("/tasks/{id}/complete", post(complete_task))
        .route("/tasks/{id}/uncomplete", post(uncomplete_task))
        .route("/tasks/{id}", axum::routing::delete(delete_task))
        .route("/task-options", post(add_task_option))
        .route("/task-options/{id}", axum::routing::delete(delete_task_option))
        .route("/task-options/{id}/use", post(use_task_option))
}
