//! MCP tool request and response types with JSON Schema for AI parameter generation

use bodyscan_core::models::{AnalysisResult, PhotoType};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct UploadPhotoRequest {
    #[schemars(description = "Identifier of the person the photo belongs to")]
    pub owner: String,
    #[schemars(description = "Local path to a JPG, PNG or WEBP photo")]
    pub file_path: String,
    #[schemars(description = "Angle of the photo: front, side, back or other (default front)")]
    pub photo_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AnalyzePhotoRequest {
    #[schemars(description = "Identifier of the person the photo belongs to")]
    pub owner: String,
    #[schemars(description = "Filename returned by upload_photo")]
    pub filename: String,
    #[schemars(description = "Instruction that replaces the default analysis prompt")]
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct AnalyzeMultiAngleRequest {
    #[schemars(description = "Identifier of the person the photos belong to")]
    pub owner: String,
    #[schemars(description = "One to four filenames returned by upload_photo")]
    pub filenames: Vec<String>,
    #[schemars(description = "Angle of each photo in the same order as filenames")]
    pub photo_types: Option<Vec<String>>,
    #[schemars(description = "Instruction that replaces the default multi-angle prompt")]
    pub prompt: Option<String>,
}

#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct DeletePhotoRequest {
    #[schemars(description = "Identifier of the person the photo belongs to")]
    pub owner: String,
    #[schemars(description = "Filename returned by upload_photo")]
    pub filename: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadPhotoResult {
    pub filename: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
    pub size: u64,
    pub faces_detected: usize,
    pub is_anonymized: bool,
    pub photo_type: PhotoType,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalyzePhotoResult {
    pub result: AnalysisResult,
    pub analysis_duration_ms: u64,
    pub provider: String,
    pub model: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ServerInfoResult {
    pub name: String,
    pub version: String,
    pub provider: String,
    pub model: String,
    pub face_detector: String,
}
