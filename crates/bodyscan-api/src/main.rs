use bodyscan_core::Config;
use bodyscan_infra::{init_basic, LogFormat, LogTarget};

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Loads .env as a side effect, so LOG_FORMAT may come from there too.
    let config = Config::from_env()?;
    init_basic(LogFormat::from_env(), LogTarget::Stdout);
    tracing::info!(environment = %config.server.environment, "Configuration loaded and validated");

    let (_state, router) = bodyscan_api::setup::initialize_app(config.clone()).await?;
    bodyscan_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
