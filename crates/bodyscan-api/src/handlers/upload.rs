use std::sync::Arc;

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use bodyscan_core::models::{PhotoType, RawUpload};
use bodyscan_core::AppError;
use bodyscan_storage::photo_id;
use bytes::Bytes;
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{ErrorResponse, HttpAppError};
use crate::extract::Owner;
use crate::state::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct PhotoUploadResponse {
    pub photo_id: Uuid,
    pub filename: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
    /// Size of the stored JPEG in bytes
    pub size: u64,
    pub faces_detected: usize,
    pub is_anonymized: bool,
    pub photo_type: PhotoType,
    pub message: String,
}

struct UploadForm {
    filename: String,
    data: Bytes,
    photo_type: PhotoType,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut file: Option<(String, Bytes)> = None;
    let mut photo_type = PhotoType::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name().unwrap_or_default() {
            "file" => {
                if file.is_some() {
                    return Err(AppError::InvalidInput(
                        "Send exactly one field named 'file'".to_string(),
                    ));
                }
                let filename = field
                    .file_name()
                    .map(str::to_string)
                    .filter(|name| !name.trim().is_empty())
                    .ok_or_else(|| {
                        AppError::InvalidInput("Uploaded file has no filename".to_string())
                    })?;
                let data = field.bytes().await.map_err(multipart_error)?;
                file = Some((filename, data));
            }
            "photo_type" => {
                let value = field.text().await.map_err(multipart_error)?;
                photo_type = value.parse().map_err(AppError::InvalidInput)?;
            }
            _ => {}
        }
    }

    let (filename, data) =
        file.ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;
    Ok(UploadForm {
        filename,
        data,
        photo_type,
    })
}

fn multipart_error(err: axum::extract::multipart::MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(err.body_text())
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Upload a photo
///
/// Validates the file, downsizes it, blurs detected faces and stores it as JPEG.
#[utoipa::path(
    post,
    path = "/api/upload",
    tag = "photos",
    params(("X-User-Id" = String, Header, description = "Owner of the photo")),
    request_body(content = inline(Object), content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Photo stored", body = PhotoUploadResponse),
        (status = 400, description = "Invalid or corrupt image", body = ErrorResponse),
        (status = 401, description = "Missing X-User-Id", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, owner, multipart), fields(owner = %owner.as_str()))]
pub async fn upload_photo(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    multipart: Multipart,
) -> Result<Json<PhotoUploadResponse>, HttpAppError> {
    let form = read_upload_form(multipart).await?;
    let stored = state
        .pipeline
        .process_upload(RawUpload::new(form.filename, form.data, owner.as_str()))
        .await?;

    let photo_id = photo_id(&stored.filename).ok_or_else(|| {
        AppError::Internal(format!("Generated filename has no id: {}", stored.filename))
    })?;

    Ok(Json(PhotoUploadResponse {
        photo_id,
        message: format!(
            "Photo uploaded successfully. {} face(s) detected and blurred.",
            stored.faces_detected
        ),
        filename: stored.filename,
        url: stored.url,
        width: stored.width,
        height: stored.height,
        size: stored.file_size,
        faces_detected: stored.faces_detected,
        is_anonymized: stored.is_anonymized,
        photo_type: form.photo_type,
    }))
}
