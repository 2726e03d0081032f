use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::error::{ErrorResponse, HttpAppError};
use crate::extract::Owner;
use crate::state::AppState;

/// Delete a stored photo
#[utoipa::path(
    delete,
    path = "/api/photos/{filename}",
    tag = "photos",
    params(
        ("filename" = String, Path, description = "Filename returned by the upload endpoint"),
        ("X-User-Id" = String, Header, description = "Owner of the photo")
    ),
    responses(
        (status = 204, description = "Photo deleted"),
        (status = 401, description = "Missing X-User-Id", body = ErrorResponse),
        (status = 404, description = "Photo not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, owner), fields(owner = %owner.as_str()))]
pub async fn delete_photo(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    Path(filename): Path<String>,
) -> Result<StatusCode, HttpAppError> {
    state.pipeline.delete_photo(owner.as_str(), &filename).await?;
    Ok(StatusCode::NO_CONTENT)
}
