//! OpenAPI documentation, served at `/api/openapi.json` and rendered by RapiDoc at `/docs`.

use utoipa::OpenApi;

use crate::error;
use crate::handlers;
use bodyscan_core::models;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bodyscan API",
        version = "0.1.0",
        description = "Body composition estimates from photos. Uploads are downsized and face-blurred before storage; analysis is delegated to a vision model and its reply is validated before it is returned."
    ),
    paths(
        handlers::upload::upload_photo,
        handlers::analyze::analyze_photo,
        handlers::analyze::analyze_multi_angle,
        handlers::photos::delete_photo,
        handlers::health::health_check,
    ),
    components(schemas(
        error::ErrorResponse,
        handlers::upload::PhotoUploadResponse,
        handlers::analyze::AnalyzeRequest,
        handlers::analyze::MultiAngleRequest,
        handlers::analyze::AnalysisResponse,
        handlers::health::HealthResponse,
        models::AnalysisResult,
        models::ConfidenceLevel,
        models::PhotoQuality,
        models::PhotoType,
    )),
    tags(
        (name = "photos", description = "Photo upload and deletion"),
        (name = "analysis", description = "Body composition analysis"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;
