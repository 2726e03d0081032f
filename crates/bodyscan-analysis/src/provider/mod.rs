//! Vision-model providers.
//!
//! The provider is chosen once from configuration. Each variant owns its HTTP client and settings
//! and exposes the same contract: instruction plus images in, raw reply text and elapsed time out.

mod anthropic;
mod openai;

pub use anthropic::AnthropicClient;
pub use openai::OpenAiClient;

use std::time::{Duration, Instant};

use bodyscan_core::{AiProvider, AnalysisConfig};

use crate::error::AnalysisError;
use crate::prompt::AnalysisRequest;

/// Raw model reply and how long the round trip took.
#[derive(Debug, Clone)]
pub struct ProviderResponse {
    pub text: String,
    pub elapsed: Duration,
}

pub enum VisionProvider {
    OpenAi(OpenAiClient),
    Anthropic(AnthropicClient),
}

impl VisionProvider {
    pub fn from_config(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        let api_key = config
            .api_key()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                AnalysisError::Configuration(format!(
                    "{} API key is not configured",
                    config.provider
                ))
            })?
            .to_string();

        let timeout = Duration::from_secs(config.request_timeout_secs);
        let provider = match config.provider {
            AiProvider::OpenAi => VisionProvider::OpenAi(OpenAiClient::new(
                api_key,
                config.openai_model.clone(),
                config.openai_base_url.clone(),
                config.max_tokens,
                config.temperature,
                timeout,
            )?),
            AiProvider::Anthropic => VisionProvider::Anthropic(AnthropicClient::new(
                api_key,
                config.anthropic_model.clone(),
                config.anthropic_base_url.clone(),
                config.max_tokens,
                config.temperature,
                timeout,
            )?),
        };
        Ok(provider)
    }

    pub fn kind(&self) -> AiProvider {
        match self {
            VisionProvider::OpenAi(_) => AiProvider::OpenAi,
            VisionProvider::Anthropic(_) => AiProvider::Anthropic,
        }
    }

    pub fn model(&self) -> &str {
        match self {
            VisionProvider::OpenAi(client) => client.model(),
            VisionProvider::Anthropic(client) => client.model(),
        }
    }

    /// Send the request and return the model's raw text.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<ProviderResponse, AnalysisError> {
        if request.images.is_empty() {
            return Err(AnalysisError::InvalidRequest(
                "At least one image is required".to_string(),
            ));
        }

        let started = Instant::now();
        let text = match self {
            VisionProvider::OpenAi(client) => client.complete(request).await?,
            VisionProvider::Anthropic(client) => client.complete(request).await?,
        };
        let elapsed = started.elapsed();

        tracing::debug!(
            provider = %self.kind(),
            model = %self.model(),
            elapsed_ms = elapsed.as_millis() as u64,
            response_chars = text.chars().count(),
            "Vision model responded"
        );

        Ok(ProviderResponse { text, elapsed })
    }
}

/// Pull a readable message out of a provider error body, falling back to the raw text.
pub(crate) fn error_body_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| {
            let trimmed = body.trim();
            if trimmed.is_empty() {
                "Unknown error".to_string()
            } else {
                trimmed.chars().take(500).collect()
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_key_is_configuration_error() {
        let config = AnalysisConfig::default();
        match VisionProvider::from_config(&config) {
            Err(AnalysisError::Configuration(msg)) => assert!(msg.contains("OpenAI")),
            _ => panic!("expected configuration error"),
        }
    }

    #[test]
    fn test_selects_configured_provider() {
        let config = AnalysisConfig {
            provider: AiProvider::Anthropic,
            anthropic_api_key: Some("sk-ant-test".to_string()),
            ..AnalysisConfig::default()
        };
        let provider = VisionProvider::from_config(&config).unwrap();
        assert_eq!(provider.kind(), AiProvider::Anthropic);
        assert_eq!(provider.model(), config.anthropic_model);
    }

    #[test]
    fn test_error_body_message() {
        assert_eq!(
            error_body_message(r#"{"error":{"message":"Invalid API key","type":"auth"}}"#),
            "Invalid API key"
        );
        assert_eq!(error_body_message("upstream down"), "upstream down");
        assert_eq!(error_body_message(""), "Unknown error");
    }
}
