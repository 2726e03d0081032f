use std::sync::Arc;

use axum::{extract::State, Json};
use bodyscan_analysis::{AnalysisOutcome, MAX_ANGLES};
use bodyscan_core::models::{AnalysisResult, PhotoType};
use bodyscan_core::AppError;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::extract::Owner;
use crate::state::AppState;

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    /// Filename returned by the upload endpoint
    pub filename: String,
    /// Replaces the default instruction when non-blank
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MultiAngleRequest {
    pub filenames: Vec<String>,
    /// Angle of each photo, in the same order as `filenames`. Unlabelled photos count as `other`.
    #[serde(default)]
    pub photo_types: Option<Vec<PhotoType>>,
    #[serde(default)]
    pub prompt: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalysisResponse {
    pub result: AnalysisResult,
    pub analysis_duration_ms: u64,
    /// `openai` or `anthropic`
    pub provider: String,
    pub model: String,
}

impl From<AnalysisOutcome> for AnalysisResponse {
    fn from(outcome: AnalysisOutcome) -> Self {
        Self {
            result: outcome.result,
            analysis_duration_ms: outcome.elapsed_ms,
            provider: outcome.provider.as_str().to_string(),
            model: outcome.model,
        }
    }
}

/// Analyze a stored photo
#[utoipa::path(
    post,
    path = "/api/analyze",
    tag = "analysis",
    params(("X-User-Id" = String, Header, description = "Owner of the photo")),
    request_body = AnalyzeRequest,
    responses(
        (status = 200, description = "Accepted analysis", body = AnalysisResponse),
        (status = 401, description = "Missing X-User-Id", body = ErrorResponse),
        (status = 404, description = "Photo not found", body = ErrorResponse),
        (status = 422, description = "Result failed the acceptance check", body = ErrorResponse),
        (status = 502, description = "Provider failure or malformed reply", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, owner, request), fields(owner = %owner.as_str(), filename = %request.filename))]
pub async fn analyze_photo(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    ValidatedJson(request): ValidatedJson<AnalyzeRequest>,
) -> Result<Json<AnalysisResponse>, HttpAppError> {
    let image = state
        .pipeline
        .load_for_analysis(owner.as_str(), &request.filename)
        .await?;
    let outcome = state
        .analysis
        .analyze_body_composition(image, request.prompt.as_deref())
        .await?;

    Ok(Json(outcome.into()))
}

/// Analyze several photos of the same person together
#[utoipa::path(
    post,
    path = "/api/analyze/multi-angle",
    tag = "analysis",
    params(("X-User-Id" = String, Header, description = "Owner of the photos")),
    request_body = MultiAngleRequest,
    responses(
        (status = 200, description = "Accepted analysis", body = AnalysisResponse),
        (status = 400, description = "Wrong number of photos", body = ErrorResponse),
        (status = 404, description = "Photo not found", body = ErrorResponse),
        (status = 422, description = "Result failed the acceptance check", body = ErrorResponse),
        (status = 502, description = "Provider failure or malformed reply", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, owner, request), fields(owner = %owner.as_str(), photos = request.filenames.len()))]
pub async fn analyze_multi_angle(
    State(state): State<Arc<AppState>>,
    owner: Owner,
    ValidatedJson(request): ValidatedJson<MultiAngleRequest>,
) -> Result<Json<AnalysisResponse>, HttpAppError> {
    let count = request.filenames.len();
    if count == 0 || count > MAX_ANGLES {
        return Err(AppError::InvalidInput(format!(
            "Provide between 1 and {} filenames, got {}",
            MAX_ANGLES, count
        ))
        .into());
    }
    let photo_types = match request.photo_types {
        Some(types) if types.len() != count => {
            return Err(AppError::InvalidInput(format!(
                "photo_types has {} entries but {} filenames were given",
                types.len(),
                count
            ))
            .into())
        }
        Some(types) => types,
        None => vec![PhotoType::Other; count],
    };

    let mut images = Vec::with_capacity(count);
    for (filename, photo_type) in request.filenames.iter().zip(photo_types) {
        let image = state
            .pipeline
            .load_for_analysis(owner.as_str(), filename)
            .await?;
        images.push((photo_type, image));
    }

    let outcome = state
        .analysis
        .analyze_multi_angle(images, request.prompt.as_deref())
        .await?;

    Ok(Json(outcome.into()))
}
