//! Test helpers: build AppState and router for integration tests.
//!
//! The face detector is an in-process fake and the vision provider is a mockito server, so
//! the tests need neither AWS nor network access.

pub mod fixtures;

use std::sync::Arc;

use async_trait::async_trait;
use axum_test::TestServer;
use bodyscan_analysis::AnalysisService;
use bodyscan_api::constants;
use bodyscan_api::setup::routes;
use bodyscan_api::AppState;
use bodyscan_core::{AiProvider, Config};
use bodyscan_processing::{DetectionError, FaceDetector, FaceRegion, ImagePipeline};
use bodyscan_storage::LocalStorage;
use image::RgbImage;
use mockito::ServerGuard;
use tempfile::TempDir;

pub const OWNER: &str = "user-42";

/// API path under the `/api` prefix.
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

/// Reports one face in the upper middle of every image.
pub struct OneFaceDetector;

#[async_trait]
impl FaceDetector for OneFaceDetector {
    fn name(&self) -> &'static str {
        "one-face"
    }

    async fn detect(&self, image: &RgbImage) -> Result<Vec<FaceRegion>, DetectionError> {
        let (width, height) = image.dimensions();
        Ok(FaceRegion::from_ratios(0.4, 0.05, 0.2, 0.15, width, height)
            .into_iter()
            .collect())
    }
}

/// Test application: server plus the resources it borrows.
pub struct TestApp {
    pub server: TestServer,
    pub provider: ServerGuard,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Build the app against a temp storage root and an Anthropic mock; `customize` adjusts config.
pub async fn setup_test_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let temp_dir = TempDir::new().expect("temp dir");
    let provider = mockito::Server::new_async().await;

    let mut config = Config::default();
    config.storage.local_storage_path = temp_dir.path().to_string_lossy().to_string();
    config.storage.local_storage_base_url = "http://localhost:8000/media".to_string();
    config.analysis.provider = AiProvider::Anthropic;
    config.analysis.anthropic_api_key = Some("sk-ant-test".to_string());
    config.analysis.anthropic_base_url = provider.url();
    customize(&mut config);

    let storage = LocalStorage::new(
        config.storage.local_storage_path.clone(),
        config.storage.local_storage_base_url.clone(),
    )
    .await
    .expect("local storage");
    let pipeline = ImagePipeline::new(&config.image, Arc::new(OneFaceDetector), Arc::new(storage));
    let analysis = AnalysisService::from_config(&config.analysis).expect("analysis service");

    let state = Arc::new(AppState::new(config, pipeline, analysis));
    let router = routes::setup_routes(&state.config, state.clone()).expect("routes");
    let server = TestServer::new(router).expect("test server");

    TestApp {
        server,
        provider,
        _temp_dir: temp_dir,
    }
}
