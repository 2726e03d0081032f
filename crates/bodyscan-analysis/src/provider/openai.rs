use std::time::Duration;

use serde_json::json;

use bodyscan_core::AiProvider;

use super::error_body_message;
use crate::error::AnalysisError;
use crate::prompt::AnalysisRequest;

/// OpenAI chat completions client with image input.
pub struct OpenAiClient {
    http_client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    max_tokens: u32,
    temperature: f32,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OpenAiClient {
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

    fn request_body(&self, request: &AnalysisRequest) -> serde_json::Value {
        let mut content = vec![json!({ "type": "text", "text": request.instruction })];
        content.extend(request.images.iter().map(|image| {
            json!({
                "type": "image_url",
                "image_url": { "url": image.data_url() }
            })
        }));

        json!({
            "model": self.model,
            "max_tokens": self.max_tokens,
            "temperature": self.temperature,
            "messages": [{ "role": "user", "content": content }]
        })
    }

    pub(crate) async fn complete(&self, request: &AnalysisRequest) -> Result<String, AnalysisError> {
        let fail = |msg: String| AnalysisError::provider(AiProvider::OpenAi, msg);

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&self.request_body(request))
            .send()
            .await
            .map_err(|e| fail(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(fail(format!("{} - {}", status, error_body_message(&error_text))));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| fail(format!("unreadable response body: {}", e)))?;

        body.pointer("/choices/0/message/content")
            .and_then(|content| content.as_str())
            .map(str::to_string)
            .ok_or_else(|| fail("response contained no message content".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::AnalysisRequest;

    fn client(base_url: &str) -> OpenAiClient {
        OpenAiClient::new(
            "sk-test".to_string(),
            "gpt-4o".to_string(),
            base_url.to_string(),
            1000,
            0.7,
            Duration::from_secs(5),
        )
        .unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let body = client("http://localhost").request_body(&AnalysisRequest::single(
            b"abc".to_vec(),
            Some("estimate"),
        ));
        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 1000);
        let content = body["messages"][0]["content"].as_array().unwrap();
        assert_eq!(content[0]["type"], "text");
        assert_eq!(content[0]["text"], "estimate");
        assert_eq!(
            content[1]["image_url"]["url"],
            "data:image/jpeg;base64,YWJj"
        );
    }

    #[tokio::test]
    async fn test_complete_returns_first_choice() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer sk-test")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices":[{"message":{"role":"assistant","content":"{\"ok\":true}"}}]}"#)
            .create_async()
            .await;

        let text = client(&server.url())
            .complete(&AnalysisRequest::single(vec![1, 2, 3], None))
            .await
            .unwrap();
        assert_eq!(text, r#"{"ok":true}"#);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_names_provider() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(401)
            .with_body(r#"{"error":{"message":"Incorrect API key provided"}}"#)
            .create_async()
            .await;

        let err = client(&server.url())
            .complete(&AnalysisRequest::single(vec![1], None))
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("OpenAI analysis failed:"), "{message}");
        assert!(message.contains("Incorrect API key provided"));
    }

    #[tokio::test]
    async fn test_missing_content_is_provider_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(200)
            .with_body(r#"{"choices":[]}"#)
            .create_async()
            .await;

        let err = client(&server.url())
            .complete(&AnalysisRequest::single(vec![1], None))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::Provider {
                provider: AiProvider::OpenAi,
                ..
            }
        ));
    }
}
