use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::user::UserError;
use services::services::leave::LeaveError;
use thiserror::Error;
use utils::response::ApiResponse;

/// Route-level error. Converts every failure into the JSON error envelope
/// with a matching HTTP status.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    User(#[from] UserError),
    #[error(transparent)]
    Leave(#[from] LeaveError),
    #[error("{0}")]
    BadRequest(String),
    #[error("Authentication required")]
    Unauthorized,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    NotFound(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Multipart(#[from] axum::extract::multipart::MultipartError),
}

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Database(sqlx::Error::RowNotFound) => StatusCode::NOT_FOUND,
            ApiError::Database(_) | ApiError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::User(UserError::UserNotFound) => StatusCode::NOT_FOUND,
            ApiError::User(UserError::LastAdmin) | ApiError::User(UserError::SelfDelete) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::User(UserError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Leave(LeaveError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Leave(LeaveError::NotRequester) => StatusCode::FORBIDDEN,
            ApiError::Leave(LeaveError::Database(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Leave(_) => StatusCode::BAD_REQUEST,
            ApiError::BadRequest(_) | ApiError::Multipart(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        let body: ApiResponse<()> = ApiResponse::error(self.to_string());
        (status, Json(body)).into_response()
    }
}
