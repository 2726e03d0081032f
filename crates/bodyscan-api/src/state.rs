//! Application state shared by all handlers.

use std::sync::Arc;

use bodyscan_analysis::AnalysisService;
use bodyscan_core::Config;
use bodyscan_processing::ImagePipeline;

pub struct AppState {
    pub config: Arc<Config>,
    pub pipeline: Arc<ImagePipeline>,
    pub analysis: Arc<AnalysisService>,
}

impl AppState {
    pub fn new(config: Config, pipeline: ImagePipeline, analysis: AnalysisService) -> Self {
        Self {
            config: Arc::new(config),
            pipeline: Arc::new(pipeline),
            analysis: Arc::new(analysis),
        }
    }
}
