use axum::{
    extract::Path,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use rust_embed::RustEmbed;

/// The built frontend shell, embedded at compile time.
#[derive(RustEmbed)]
#[folder = "static"]
struct FrontendAssets;

fn serve_asset(path: &str) -> Response {
    match FrontendAssets::get(path) {
        Some(content) => {
            let mime = mime_guess::from_path(path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref().to_string())],
                content.data.into_owned(),
            )
                .into_response()
        }
        // Unknown paths fall back to the shell so client-side routing works.
        None => match FrontendAssets::get("index.html") {
            Some(index) => (
                [(header::CONTENT_TYPE, "text/html; charset=utf-8".to_string())],
                index.data.into_owned(),
            )
                .into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        },
    }
}

pub async fn serve_frontend_root() -> Response {
    serve_asset("index.html")
}

pub async fn serve_frontend(Path(path): Path<String>) -> Response {
    serve_asset(path.trim_start_matches('/'))
}
