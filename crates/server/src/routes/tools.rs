use axum::{
    Extension, Json, Router,
    extract::{Multipart, State},
    middleware::from_fn_with_state,
    response::Json as ResponseJson,
    routing::{get, post},
};
use db::models::{
    tool::{CreateTool, Tool, UpdateTool},
    user::User,
};
use utils::response::ApiResponse;

use crate::{AppState, error::ApiError, middleware::load_tool_middleware, uploads};

/// GET /api/tools - Tool directory, alphabetical
pub async fn get_tools(
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<Vec<Tool>>>, ApiError> {
    let tools = Tool::find_all(&state.db().pool).await?;
    Ok(ResponseJson(ApiResponse::success(tools)))
}

/// POST /api/tools - Add a tool. Multipart: `metadata` JSON part plus an
/// optional `screenshot` part.
pub async fn create_tool(
    State(state): State<AppState>,
    Extension(current): Extension<User>,
    mut multipart: Multipart,
) -> Result<ResponseJson<ApiResponse<Tool>>, ApiError> {
    let mut metadata: Option<CreateTool> = None;
    let mut screenshot: Option<String> = None;

    while let Some(field) = multipart.next_field().await? {
        match field.name() {
            Some("metadata") => {
                let raw = field.text().await?;
                metadata = Some(
                    serde_json::from_str(&raw)
                        .map_err(|e| ApiError::BadRequest(format!("Invalid metadata: {e}")))?,
                );
            }
            Some("screenshot") => {
                screenshot = Some(uploads::save_field(field, "tools").await?);
            }
            _ => continue,
        }
    }

    let metadata =
        metadata.ok_or_else(|| ApiError::BadRequest("Tool metadata is required".to_string()))?;
    if metadata.name.trim().is_empty() || metadata.link.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "A tool needs a name and a link".to_string(),
        ));
    }

    let tool = Tool::create(&state.db().pool, &metadata, screenshot.as_deref(), current.id).await?;
    Ok(ResponseJson(ApiResponse::success(tool)))
}

/// PUT /api/tools/{id} - Update a tool (creator or admin)
pub async fn update_tool(
    Extension(tool): Extension<Tool>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
    Json(payload): Json<UpdateTool>,
) -> Result<ResponseJson<ApiResponse<Tool>>, ApiError> {
    if !current.is_admin() && tool.created_by != current.id {
        return Err(ApiError::Forbidden(
            "You can only edit tools you added".to_string(),
        ));
    }
    let updated = Tool::update(&state.db().pool, tool.id, &payload).await?;
    Ok(ResponseJson(ApiResponse::success(updated)))
}

/// POST /api/tools/{id}/screenshot - Replace the screenshot
pub async fn upload_screenshot(
    Extension(tool): Extension<Tool>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    if !current.is_admin() && tool.created_by != current.id {
        return Err(ApiError::Forbidden(
            "You can only edit tools you added".to_string(),
        ));
    }
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("screenshot") {
            let path = uploads::save_field(field, "tools").await?;
            if let Some(old) = &tool.screenshot {
                uploads::remove_stored(old).await;
            }
            Tool::set_screenshot(&state.db().pool, tool.id, Some(&path)).await?;
        }
    }
    Ok(ResponseJson(ApiResponse::success(())))
}

/// DELETE /api/tools/{id} - Remove a tool (creator or admin)
pub async fn delete_tool(
    Extension(tool): Extension<Tool>,
    Extension(current): Extension<User>,
    State(state): State<AppState>,
) -> Result<ResponseJson<ApiResponse<()>>, ApiError> {
    if !current.is_admin() && tool.created_by != current.id {
        return Err(ApiError::Forbidden(
            "You can only delete tools you added".to_string(),
        ));
    }
    if let Some(path) = &tool.screenshot {
        uploads::remove_stored(path).await;
    }
    Tool::delete(&state.db().pool, tool.id).await?;
    Ok(ResponseJson(ApiResponse::success(())))
}

pub fn router(state: &AppState) -> Router<AppState> {
    let tool_router = Router::new()
        .route("/", axum::routing::put(update_tool).delete(delete_tool))
        .route("/screenshot", post(upload_screenshot))
        .layer(from_fn_with_state(state.clone(), load_tool_middleware));

    let inner = Router::new()
        .route("/", get(get_tools).post(create_tool))
        .nest("/{tool_id}", tool_router);

    Router::new().nest("/tools", inner)
}
