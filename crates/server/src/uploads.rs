//! Multipart upload storage.
//!
//! Uploaded files land under `{asset_dir}/uploads/<feature>/` with a
//! generated name; the database stores the path relative to the uploads
//! root, which is also what `/uploads/...` serves back.

use axum::extract::multipart::Field;
use uuid::Uuid;

use crate::error::ApiError;

/// Persist one multipart field to the feature's upload directory.
/// Returns the relative path to store in the database.
pub async fn save_field(field: Field<'_>, feature: &str) -> Result<String, ApiError> {
    let original_name = field.file_name().unwrap_or("upload").to_string();
    let extension = original_name
        .rsplit('.')
        .next()
        .filter(|ext| ext.len() <= 8 && *ext != original_name)
        .map(|ext| ext.to_ascii_lowercase());

    let stored_name = match extension {
        Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
        None => Uuid::new_v4().to_string(),
    };

    let data = field.bytes().await?;
    if data.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
    }

    let dir = utils::assets::upload_dir(feature);
    tokio::fs::write(dir.join(&stored_name), &data).await?;

    Ok(format!("{feature}/{stored_name}"))
}

/// Remove a previously stored upload. Missing files are ignored.
pub async fn remove_stored(relative_path: &str) {
    // Refuse anything that could escape the uploads root.
    if relative_path.contains("..") {
        return;
    }
    let path = utils::assets::asset_dir().join("uploads").join(relative_path);
    if let Err(e) = tokio::fs::remove_file(&path).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        tracing::warn!(path = %path.display(), error = %e, "Failed to remove upload");
    }
}
