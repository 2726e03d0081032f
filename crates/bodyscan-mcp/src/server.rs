//! MCP server using rmcp SDK
//!
//! Each tool delegates to a plain async method returning `Result<_, AppError>`; the tool wrapper
//! only serializes the value or converts the error.

use std::borrow::Cow;
use std::future::Future;
use std::path::{Component, Path};
use std::sync::Arc;

use bodyscan_analysis::{AnalysisOutcome, AnalysisService, MAX_ANGLES};
use bodyscan_core::models::{PhotoType, RawUpload};
use bodyscan_core::{AppError, ErrorMetadata};
use bodyscan_processing::ImagePipeline;
use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::tool::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ServerHandler};
use serde::Serialize;

use crate::tools::*;

fn text_content(s: impl Into<String>) -> Content {
    Content {
        raw: RawContent::Text(RawTextContent { text: s.into() }),
        annotations: None,
    }
}

fn internal_error(err: AppError) -> ErrorData {
    tracing::warn!(error = %err, code = err.error_code(), "Tool call failed");
    ErrorData {
        code: ErrorCode(-32603),
        message: Cow::from(err.client_message()),
        data: Some(serde_json::json!({ "code": err.error_code() })),
    }
}

fn json_result<T: Serialize>(
    result: Result<T, AppError>,
) -> Result<CallToolResult, ErrorData> {
    let value = result.map_err(internal_error)?;
    let text = serde_json::to_string(&value).map_err(|e| internal_error(e.into()))?;
    Ok(CallToolResult::success(vec![text_content(text)]))
}

fn parse_photo_type(value: Option<&str>) -> Result<PhotoType, AppError> {
    match value {
        Some(v) if !v.trim().is_empty() => v.parse().map_err(AppError::InvalidInput),
        _ => Ok(PhotoType::default()),
    }
}

impl From<AnalysisOutcome> for AnalyzePhotoResult {
    fn from(outcome: AnalysisOutcome) -> Self {
        Self {
            result: outcome.result,
            analysis_duration_ms: outcome.elapsed_ms,
            provider: outcome.provider.as_str().to_string(),
            model: outcome.model,
        }
    }
}

#[derive(Clone)]
pub struct BodyscanService {
    name: String,
    pipeline: Arc<ImagePipeline>,
    analysis: Arc<AnalysisService>,
    tool_router: ToolRouter<BodyscanService>,
}

impl std::fmt::Debug for BodyscanService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BodyscanService")
            .field("name", &self.name)
            .finish()
    }
}

impl BodyscanService {
    pub async fn upload(&self, req: UploadPhotoRequest) -> Result<UploadPhotoResult, AppError> {
        let path = Path::new(&req.file_path);
        if path.components().any(|c| c == Component::ParentDir) {
            return Err(AppError::InvalidInput(format!(
                "Invalid file path: {}",
                req.file_path
            )));
        }
        let photo_type = parse_photo_type(req.photo_type.as_deref())?;
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| AppError::InvalidInput("file_path has no file name".to_string()))?
            .to_string();
        let data = tokio::fs::read(path).await.map_err(|e| {
            AppError::InvalidInput(format!("Failed to read {}: {}", req.file_path, e))
        })?;

        let stored = self
            .pipeline
            .process_upload(RawUpload::new(filename, data, req.owner))
            .await?;

        Ok(UploadPhotoResult {
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
            photo_type,
        })
    }

    pub async fn analyze(&self, req: AnalyzePhotoRequest) -> Result<AnalyzePhotoResult, AppError> {
        let image = self
            .pipeline
            .load_for_analysis(&req.owner, &req.filename)
            .await?;
        let outcome = self
            .analysis
            .analyze_body_composition(image, req.prompt.as_deref())
            .await?;
        Ok(outcome.into())
    }

    pub async fn analyze_angles(
        &self,
        req: AnalyzeMultiAngleRequest,
    ) -> Result<AnalyzePhotoResult, AppError> {
        let count = req.filenames.len();
        if count == 0 || count > MAX_ANGLES {
            return Err(AppError::InvalidInput(format!(
                "Provide between 1 and {} filenames, got {}",
                MAX_ANGLES, count
            )));
        }
        let types: Vec<PhotoType> = match &req.photo_types {
            Some(types) if types.len() != req.filenames.len() => {
                return Err(AppError::InvalidInput(
                    "photo_types must have one entry per filename".to_string(),
                ))
            }
            Some(types) => types
                .iter()
                .map(|t| parse_photo_type(Some(t)))
                .collect::<Result<_, _>>()?,
            None => vec![PhotoType::Other; req.filenames.len()],
        };

        let mut images = Vec::with_capacity(req.filenames.len());
        for (filename, photo_type) in req.filenames.iter().zip(types) {
            let image = self.pipeline.load_for_analysis(&req.owner, filename).await?;
            images.push((photo_type, image));
        }

        let outcome = self
            .analysis
            .analyze_multi_angle(images, req.prompt.as_deref())
            .await?;
        Ok(outcome.into())
    }

    pub async fn delete(&self, req: DeletePhotoRequest) -> Result<serde_json::Value, AppError> {
        self.pipeline.delete_photo(&req.owner, &req.filename).await?;
        Ok(serde_json::json!({
            "success": true,
            "message": format!("Photo {} deleted", req.filename)
        }))
    }

    pub fn info(&self) -> ServerInfoResult {
        ServerInfoResult {
            name: self.name.clone(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            provider: self.analysis.provider().as_str().to_string(),
            model: self.analysis.model().to_string(),
            face_detector: self.pipeline.detector_name().to_string(),
        }
    }
}

#[tool_router]
impl BodyscanService {
    pub fn new(
        name: impl Into<String>,
        pipeline: Arc<ImagePipeline>,
        analysis: Arc<AnalysisService>,
    ) -> Self {
        Self {
            name: name.into(),
            pipeline,
            analysis,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Upload a body photo from a local path. The photo is downsized, faces are blurred, and it is stored as JPEG."
    )]
    async fn upload_photo(
        &self,
        Parameters(req): Parameters<UploadPhotoRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        json_result(self.upload(req).await)
    }

    #[tool(description = "Estimate body fat percentage from a previously uploaded photo")]
    async fn analyze_photo(
        &self,
        Parameters(req): Parameters<AnalyzePhotoRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        json_result(self.analyze(req).await)
    }

    #[tool(description = "Estimate body fat percentage from up to four photos of the same person taken from different angles")]
    async fn analyze_multi_angle(
        &self,
        Parameters(req): Parameters<AnalyzeMultiAngleRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        json_result(self.analyze_angles(req).await)
    }

    #[tool(description = "Delete a previously uploaded photo")]
    async fn delete_photo(
        &self,
        Parameters(req): Parameters<DeletePhotoRequest>,
    ) -> Result<CallToolResult, ErrorData> {
        json_result(self.delete(req).await)
    }

    #[tool(description = "Show the configured analysis provider, model and face detector")]
    async fn server_info(&self) -> Result<CallToolResult, ErrorData> {
        json_result(Ok(self.info()))
    }
}

#[tool_handler]
impl ServerHandler for BodyscanService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.name.clone(),
                version: env!("CARGO_PKG_VERSION").into(),
            },
            instructions: Some(
                "Bodyscan MCP: upload body photos (faces are blurred before storage), estimate \
                 body fat percentage from one or several angles, and delete photos."
                    .to_string(),
            ),
        }
    }
}
