//! Application setup and initialization

pub mod routes;
pub mod server;

use std::sync::Arc;

use anyhow::{Context, Result};
use bodyscan_analysis::AnalysisService;
use bodyscan_core::Config;
use bodyscan_processing::{create_face_detector, ImagePipeline};
use bodyscan_storage::create_storage;

use crate::state::AppState;

/// Build storage, the intake pipeline, the analysis service and the router.
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    let storage = create_storage(&config.storage)
        .await
        .context("Failed to initialize storage")?;
    let detector = create_face_detector(&config.image.face_detector).await;
    let pipeline = ImagePipeline::new(&config.image, detector, storage);

    let analysis = AnalysisService::from_config(&config.analysis)
        .context("Failed to initialize analysis provider")?;
    tracing::info!(
        provider = %analysis.provider(),
        model = %analysis.model(),
        "Analysis provider configured"
    );

    let state = Arc::new(AppState::new(config, pipeline, analysis));
    let router = routes::setup_routes(&state.config, state.clone())?;

    Ok((state, router))
}
