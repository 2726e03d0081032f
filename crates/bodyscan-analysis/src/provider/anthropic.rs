use std::time::Duration;

use serde::{Deserialize, Serialize};

use bodyscan_core::AiProvider;

use super::error_body_message;
use crate::error::AnalysisError;
use crate::prompt::AnalysisRequest;

const API_VERSION: &str = "2023-06-01";

/// Anthropic Messages API client with image input.
pub struct AnthropicClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
    temperature: f32,
}

impl std::fmt::Debug for AnthropicClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnthropicClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

// Messages API request/response structures
#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<MessageParam>,
}

#[derive(Debug, Serialize)]
struct MessageParam {
    role: String,
    content: Vec<ContentBlock>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    Image { source: ImageSource },
}

#[derive(Debug, Serialize)]
struct ImageSource {
    #[serde(rename = "type")]
    source_type: String,
    media_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlockResponse>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlockResponse {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}

impl AnthropicClient {
    pub fn new(
        api_key: String,
        model: String,
        base_url: String,
        max_tokens: u32,
        temperature: f32,
        timeout: Duration,
    ) -> Result<Self, AnalysisError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                AnalysisError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            http_client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_tokens,
            temperature,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Images first, instruction last.
    fn request_body(&self, request: &AnalysisRequest) -> MessagesRequest {
        let mut content: Vec<ContentBlock> = request
            .images
            .iter()
            .map(|image| ContentBlock::Image {
                source: ImageSource {
                    source_type: "base64".to_string(),
                    media_type: image.media_type.clone(),
                    data: image.base64(),
                },
            })
            .collect();
        content.push(ContentBlock::Text {
            text: request.instruction.clone(),
        });

        MessagesRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            messages: vec![MessageParam {
                role: "user".to_string(),
                content,
            }],
        }
    }

    pub(crate) async fn complete(&self, request: &AnalysisRequest) -> Result<String, AnalysisError> {
        let fail = |msg: String| AnalysisError::provider(AiProvider::Anthropic, msg);

        let response = self
            .http_client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .header("content-type", "application/json")
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(|e| fail(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(fail(format!("{} - {}", status, error_body_message(&error_text))));
        }

        let parsed: MessagesResponse = response
            .json()
            .await
            .map_err(|e| fail(format!("unreadable response body: {}", e)))?;

        parsed
            .content
            .into_iter()
            .find_map(|block| match block {
                ContentBlockResponse::Text { text } => Some(text),
                ContentBlockResponse::Other => None,
            })
            .ok_or_else(|| fail("response contained no text content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bodyscan_core::models::PhotoType;

    fn client(base_url: &str) -> AnthropicClient {
        AnthropicClient::new(
            "sk-ant-test".to_string(),
            "claude-3-5-sonnet-20241022".to_string(),
            base_url.to_string(),
            1000,
            0.7,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_images_precede_instruction() {
        let request = AnalysisRequest::multi_angle(
            vec![(PhotoType::Front, vec![1]), (PhotoType::Back, vec![2])],
            None,
        );
        let body = serde_json::to_value(client("http://localhost").request_body(&request)).unwrap();
        let content = body["messages"][0]["content"].as_array().unwrap();
        assert_eq!(content.len(), 3);
        assert_eq!(content[0]["type"], "image");
        assert_eq!(content[0]["source"]["type"], "base64");
        assert_eq!(content[0]["source"]["media_type"], "image/jpeg");
        assert_eq!(content[1]["type"], "image");
        assert_eq!(content[2]["type"], "text");
    }

    #[tokio::test]
    async fn test_complete_returns_first_text_block() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/messages")
            .match_header("x-api-key", "sk-ant-test")
            .match_header("anthropic-version", API_VERSION)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"content":[{"type":"text","text":"hello"},{"type":"text","text":"ignored"}]}"#)
            .create_async()
            .await;

        let text = client(&server.url())
            .complete(&AnalysisRequest::single(vec![1], None))
            .await
            .unwrap();
        assert_eq!(text, "hello");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_limit_names_provider() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/messages")
            .with_status(429)
            .with_body(r#"{"type":"error","error":{"type":"rate_limit_error","message":"Rate limited"}}"#)
            .create_async()
            .await;

        let err = client(&server.url())
            .complete(&AnalysisRequest::single(vec![1], None))
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Anthropic analysis failed:"), "{message}");
        assert!(message.contains("429"));
        assert!(message.contains("Rate limited"));
    }
}
