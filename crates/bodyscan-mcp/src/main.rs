//! Bodyscan MCP Server
//!
//! Run with: AI_PROVIDER=anthropic ANTHROPIC_API_KEY=xxx bodyscan-mcp

use std::sync::Arc;

use anyhow::Context;
use bodyscan_analysis::AnalysisService;
use bodyscan_core::Config;
use bodyscan_infra::{init_basic, LogFormat, LogTarget};
use bodyscan_mcp::BodyscanService;
use bodyscan_processing::{create_face_detector, ImagePipeline};
use bodyscan_storage::create_storage;
use rmcp::service::ServiceExt;
use rmcp::transport::io::stdio;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    // stdout carries the protocol
    init_basic(LogFormat::from_env(), LogTarget::Stderr);

    let storage = create_storage(&config.storage)
        .await
        .context("Failed to initialize storage")?;
    let detector = create_face_detector(&config.image.face_detector).await;
    let pipeline = ImagePipeline::new(&config.image, detector, storage);
    let analysis = AnalysisService::from_config(&config.analysis)
        .context("Failed to initialize analysis provider")?;

    let service = BodyscanService::new(
        config.server.mcp_server_name.clone(),
        Arc::new(pipeline),
        Arc::new(analysis),
    );
    tracing::info!(name = %config.server.mcp_server_name, "Starting MCP server on stdio");

    let running = service.serve(stdio()).await.context("MCP transport failed")?;
    running.waiting().await.context("MCP server error")?;

    Ok(())
}
