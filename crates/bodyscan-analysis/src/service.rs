//! Analysis orchestration: prompt, provider call, parse, acceptance check.

use bodyscan_core::models::{AnalysisResult, PhotoType};
use bodyscan_core::{AiProvider, AnalysisConfig};

use crate::error::AnalysisError;
use crate::parser::parse_analysis_response;
use crate::prompt::AnalysisRequest;
use crate::provider::VisionProvider;
use crate::validation::validate_analysis_result;

/// Most photos accepted by a single multi-angle analysis.
pub const MAX_ANGLES: usize = 4;

/// Accepted result plus provenance for the caller.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub result: AnalysisResult,
    pub elapsed_ms: u64,
    pub provider: AiProvider,
    pub model: String,
}

pub struct AnalysisService {
    provider: VisionProvider,
}

impl AnalysisService {
    pub fn new(provider: VisionProvider) -> Self {
        Self { provider }
    }

    pub fn from_config(config: &AnalysisConfig) -> Result<Self, AnalysisError> {
        Ok(Self::new(VisionProvider::from_config(config)?))
    }

    pub fn provider(&self) -> AiProvider {
        self.provider.kind()
    }

    pub fn model(&self) -> &str {
        self.provider.model()
    }

    /// Analyze one anonymized JPEG.
    pub async fn analyze_body_composition(
        &self,
        image: Vec<u8>,
        prompt: Option<&str>,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        if image.is_empty() {
            return Err(AnalysisError::InvalidRequest(
                "Image data is empty".to_string(),
            ));
        }
        self.run(AnalysisRequest::single(image, prompt)).await
    }

    /// Analyze several photos of the same person as one request.
    pub async fn analyze_multi_angle(
        &self,
        images: Vec<(PhotoType, Vec<u8>)>,
        prompt: Option<&str>,
    ) -> Result<AnalysisOutcome, AnalysisError> {
        if images.is_empty() || images.len() > MAX_ANGLES {
            return Err(AnalysisError::InvalidRequest(format!(
                "Multi-angle analysis needs between 1 and {} photos, got {}",
                MAX_ANGLES,
                images.len()
            )));
        }
        if images.iter().any(|(_, data)| data.is_empty()) {
            return Err(AnalysisError::InvalidRequest(
                "Image data is empty".to_string(),
            ));
        }
        self.run(AnalysisRequest::multi_angle(images, prompt)).await
    }

    async fn run(&self, request: AnalysisRequest) -> Result<AnalysisOutcome, AnalysisError> {
        let images = request.images.len();
        let response = self.provider.analyze(&request).await.inspect_err(|e| {
            tracing::error!(provider = %self.provider.kind(), error = %e, "Vision model call failed");
        })?;

        let result = parse_analysis_response(&response.text).inspect_err(|e| {
            tracing::warn!(
                provider = %self.provider.kind(),
                reason = e.contract_reason().unwrap_or_default(),
                error = %e,
                "Unparseable analysis reply"
            );
        })?;
        validate_analysis_result(&result).inspect_err(|e| {
            tracing::warn!(
                provider = %self.provider.kind(),
                body_fat_percentage = result.body_fat_percentage,
                error = %e,
                "Analysis result rejected"
            );
        })?;

        let elapsed_ms = response.elapsed.as_millis() as u64;
        tracing::info!(
            provider = %self.provider.kind(),
            model = %self.provider.model(),
            images,
            elapsed_ms,
            body_fat_percentage = result.body_fat_percentage,
            confidence = %result.confidence,
            "Body composition analysis completed"
        );

        Ok(AnalysisOutcome {
            result,
            elapsed_ms,
            provider: self.provider.kind(),
            model: self.provider.model().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bodyscan_core::models::{ConfidenceLevel, PhotoQuality};
    use serde_json::json;

    fn anthropic_service(base_url: &str) -> AnalysisService {
        let config = AnalysisConfig {
            provider: AiProvider::Anthropic,
            anthropic_api_key: Some("sk-ant-test".to_string()),
            anthropic_base_url: base_url.to_string(),
            ..AnalysisConfig::default()
        };
        AnalysisService::from_config(&config).unwrap()
    }

    fn anthropic_reply(text: &str) -> String {
        json!({ "content": [{ "type": "text", "text": text }] }).to_string()
    }

    #[tokio::test]
    async fn test_fenced_reply_is_accepted() {
        let mut server = mockito::Server::new_async().await;
        let reply = "```json\n{\"body_fat_percentage\": 18.2, \"confidence\": \"High\", \"reasoning\": \"Visible muscle definition, lean physique overall.\", \"photo_quality\": \"Good\"} \n```";
        let _mock = server
            .mock("POST", "/messages")
            .with_status(200)
            .with_body(anthropic_reply(reply))
            .create_async()
            .await;

        let service = anthropic_service(&server.url());
        let outcome = service
            .analyze_body_composition(vec![0xFF, 0xD8, 0xFF], None)
            .await
            .unwrap();

        assert_eq!(outcome.provider, AiProvider::Anthropic);
        assert_eq!(outcome.result.body_fat_percentage, 18.2);
        assert_eq!(outcome.result.confidence, ConfidenceLevel::High);
        assert_eq!(outcome.result.photo_quality, PhotoQuality::Good);
    }

    #[tokio::test]
    async fn test_terse_reasoning_is_rejected() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/messages")
            .with_status(200)
            .with_body(anthropic_reply(
                r#"{"body_fat_percentage": 20, "confidence": "low", "reasoning": "ok", "photo_quality": "poor"}"#,
            ))
            .create_async()
            .await;

        let err = anthropic_service(&server.url())
            .analyze_body_composition(vec![1], None)
            .await
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Unacceptable(_)));
    }

    #[tokio::test]
    async fn test_provider_failure_is_terminal() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/messages")
            .with_status(500)
            .with_body("overloaded")
            .expect(1)
            .create_async()
            .await;

        let err = anthropic_service(&server.url())
            .analyze_body_composition(vec![1], None)
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("Anthropic analysis failed:"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_multi_angle_bounds() {
        let service = anthropic_service("http://127.0.0.1:9");
        let err = service.analyze_multi_angle(vec![], None).await.unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidRequest(_)));

        let too_many = (0..=MAX_ANGLES).map(|_| (PhotoType::Front, vec![1])).collect();
        let err = service.analyze_multi_angle(too_many, None).await.unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidRequest(_)));
    }

    #[tokio::test]
    async fn test_multi_angle_keeps_consistency_check() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/messages")
            .with_status(200)
            .with_body(anthropic_reply(
                r#"{"body_fat_percentage": 24.04, "confidence": "medium", "reasoning": "Front and side views show a soft midsection.", "photo_quality": "fair", "consistency_check": "consistent"}"#,
            ))
            .create_async()
            .await;

        let outcome = anthropic_service(&server.url())
            .analyze_multi_angle(
                vec![(PhotoType::Front, vec![1]), (PhotoType::Side, vec![2])],
                None,
            )
            .await
            .unwrap();
        assert_eq!(outcome.result.body_fat_percentage, 24.0);
        assert_eq!(outcome.result.consistency_check.as_deref(), Some("consistent"));
    }
}
