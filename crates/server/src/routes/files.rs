use axum::{
    extract::Path,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};

/// GET /uploads/{*path} - Serve a stored upload from the asset tree.
pub async fn serve_upload(Path(path): Path<String>) -> Response {
    // Refuse anything that could escape the uploads root.
    if path.contains("..") {
        return StatusCode::NOT_FOUND.into_response();
    }

    let full_path = utils::assets::asset_dir().join("uploads").join(&path);
    match tokio::fs::read(&full_path).await {
        Ok(bytes) => {
            let mime = mime_guess::from_path(&full_path).first_or_octet_stream();
            ([(header::CONTENT_TYPE, mime.as_ref().to_string())], bytes).into_response()
        }
        Err(_) => StatusCode::NOT_FOUND.into_response(),
    }
}
