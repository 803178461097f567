//! Multipart file intake shared by the character and profile handlers.

use std::path::Path;

use axum::extract::multipart::Field;

use crate::error::{AppError, AppResult};

/// Extensions accepted for uploaded images.
pub const SUPPORTED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

/// A file pulled out of a multipart form, not yet written to disk.
#[derive(Debug)]
pub struct Upload {
    pub filename: String,
    pub data: Vec<u8>,
}

impl Upload {
    /// Buffer a multipart file field.
    pub async fn from_field(field: Field<'_>, fallback_name: &str) -> AppResult<Self> {
        let filename = field.file_name().unwrap_or(fallback_name).to_string();
        let data = field.bytes().await?;
        Ok(Self {
            filename,
            data: data.to_vec(),
        })
    }

    /// Lowercased extension, rejected unless it is a known image type.
    pub fn image_extension(&self) -> AppResult<String> {
        let ext = self
            .filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        if !SUPPORTED_IMAGE_EXTENSIONS.contains(&ext.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Unsupported image format '.{ext}'. Supported: {}",
                SUPPORTED_IMAGE_EXTENSIONS.join(", ")
            )));
        }
        Ok(ext)
    }

    /// Write the file under `dir` with a collision-free name and return the
    /// stored path (`{dir}/{timestamp}_{uuid}.{ext}`).
    pub async fn save_image(&self, dir: &str) -> AppResult<String> {
        let ext = self.image_extension()?;

        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        let stored_name = stored_filename(&ext);
        let path = Path::new(dir).join(&stored_name);
        tokio::fs::write(&path, &self.data)
            .await
            .map_err(|e| AppError::InternalError(e.to_string()))?;

        tracing::debug!(path = %path.display(), bytes = self.data.len(), "Stored upload");
        Ok(path.to_string_lossy().into_owned())
    }
}

/// Remove a stored upload whose database write did not go through.
///
/// Failures are logged and swallowed; the caller is already returning an error.
pub async fn discard_stored(path: Option<&str>) {
    let Some(path) = path else {
        return;
    };
    match tokio::fs::remove_file(path).await {
        Ok(()) => tracing::debug!(path, "Discarded orphaned upload"),
        Err(e) => tracing::warn!(path, error = %e, "Failed to discard orphaned upload"),
    }
}

fn stored_filename(ext: &str) -> String {
    format!(
        "{}_{}.{ext}",
        chrono::Utc::now().format("%Y%m%d%H%M%S"),
        uuid::Uuid::new_v4().simple()
    )
}
