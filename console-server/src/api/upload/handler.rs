//! Category Image Upload Handler
//!
//! Accepts one multipart `file` field (PNG, JPEG, WebP), stores it in the blob
//! store and returns the public download URL.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::{Multipart, State};
use serde::Serialize;
use shared::error::ErrorCode;
use shared::store::UploadProgress;
use shared::util::{now_millis, random_base36};
use std::path::PathBuf;
use tokio::sync::mpsc;

use crate::core::ServerState;
use crate::utils::{ApiResponse, AppError, AppResult, ok};

/// Maximum file size (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Upload response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub url: String,
    pub path: String,
    pub original_name: String,
    pub size: usize,
    pub content_type: String,
}

fn multipart_error(e: MultipartError) -> AppError {
    AppError::validation(format!("Invalid multipart request: {}", e))
}

/// Validate size and extension, returning the lowercased extension
fn validate_image(data: &[u8], filename: &str) -> Result<String, AppError> {
    if data.is_empty() {
        return Err(AppError::validation("Empty file provided"));
    }

    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!(
                "File too large. Maximum size is {} bytes ({}MB)",
                MAX_FILE_SIZE,
                MAX_FILE_SIZE / 1024 / 1024
            ),
        )
        .with_detail("size", data.len()));
    }

    let ext = PathBuf::from(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_lowercase)
        .ok_or_else(|| AppError::validation(format!("Invalid file extension for: {}", filename)))?;

    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::validation(format!(
            "Unsupported file format '{}'. Supported: {}",
            ext,
            SUPPORTED_FORMATS.join(", ")
        ))
        .with_detail("format", ext));
    }

    Ok(ext)
}

/// Storage path: `category/category_{millis}_{random}.{ext}`
fn object_path(ext: &str) -> String {
    format!("category/category_{}_{}.{}", now_millis(), random_base36(9), ext)
}

/// POST /api/uploads/category
pub async fn upload_category_image(
    State(state): State<ServerState>,
    mut multipart: Multipart,
) -> AppResult<Json<ApiResponse<UploadResponse>>> {
    let mut field_data: Option<Vec<u8>> = None;
    let mut original_filename = None;

    while let Some(f) = multipart.next_field().await.map_err(multipart_error)? {
        if f.name() == Some("file") {
            original_filename = f.file_name().map(|s| s.to_string());
            field_data = Some(f.bytes().await.map_err(multipart_error)?.to_vec());
            break;
        }
    }

    let data = field_data
        .ok_or_else(|| AppError::validation("No 'file' field found. Field name must be 'file'"))?;
    let filename = original_filename
        .ok_or_else(|| AppError::validation("No filename provided in file field"))?;

    let ext = validate_image(&data, &filename)?;
    let path = object_path(&ext);
    let content_type = mime_guess::from_ext(&ext).first_or_octet_stream().to_string();
    let size = data.len();

    let (tx, mut rx) = mpsc::channel::<UploadProgress>(16);
    let progress_path = path.clone();
    let reporter = tokio::spawn(async move {
        while let Some(p) = rx.recv().await {
            tracing::debug!(path = %progress_path, percent = p.percent(), "Upload progress");
        }
    });

    let uploaded = state.blobs.upload(&path, data, &content_type, Some(tx)).await;
    // Sender is dropped by the store once the upload returns
    let _ = reporter.await;

    let url = uploaded.map_err(|e| {
        tracing::error!(path = %path, error = %e, "Category image upload failed");
        AppError::with_message(ErrorCode::BlobUploadFailed, e.to_string())
            .with_detail("path", path.clone())
    })?;

    tracing::info!(
        original_name = %filename,
        path = %path,
        size,
        "Category image uploaded"
    );

    Ok(ok(UploadResponse {
        url,
        path,
        original_name: filename,
        size,
        content_type,
    }))
}
