use bodyscan_core::{AiProvider, AppError};

/// Longest slice of a model reply carried in an error.
pub const RESPONSE_EXCERPT_CHARS: usize = 200;

/// Longest parse-failure reason kept for logs. The reason never reaches clients.
const REASON_CHARS: usize = 160;

#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Transport failure, non-success status, or an unusable envelope from the provider.
    #[error("{provider} analysis failed: {message}")]
    Provider {
        provider: AiProvider,
        message: String,
    },

    /// The reply text does not satisfy the response contract. Only the excerpt is displayed.
    #[error("Failed to parse AI response. Raw response: {excerpt}")]
    InvalidResponse { reason: String, excerpt: String },

    /// Parsed, but rejected by the acceptance check.
    #[error("Analysis result rejected: {0}")]
    Unacceptable(String),

    #[error("Invalid analysis request: {0}")]
    InvalidRequest(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AnalysisError {
    pub(crate) fn provider(provider: AiProvider, message: impl Into<String>) -> Self {
        AnalysisError::Provider {
            provider,
            message: message.into(),
        }
    }

    pub(crate) fn invalid_response(reason: impl Into<String>, raw: &str) -> Self {
        AnalysisError::InvalidResponse {
            reason: reason.into().chars().take(REASON_CHARS).collect(),
            excerpt: raw.chars().take(RESPONSE_EXCERPT_CHARS).collect(),
        }
    }

    /// Why a reply broke the response contract, for logging.
    pub fn contract_reason(&self) -> Option<&str> {
        match self {
            AnalysisError::InvalidResponse { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

impl From<AnalysisError> for AppError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::Provider { provider, message } => AppError::AnalysisProvider {
                provider: provider.display_name().to_string(),
                message,
            },
            e @ AnalysisError::InvalidResponse { .. } => {
                AppError::InvalidAnalysisResponse(e.to_string())
            }
            AnalysisError::Unacceptable(reason) => AppError::UnacceptableResult(reason),
            AnalysisError::InvalidRequest(msg) => AppError::InvalidInput(msg),
            AnalysisError::Configuration(msg) => AppError::Configuration(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_is_bounded_by_chars() {
        let raw = "é".repeat(500);
        match AnalysisError::invalid_response("expected value", &raw) {
            AnalysisError::InvalidResponse { excerpt, .. } => {
                assert_eq!(excerpt.chars().count(), 200)
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_contract_failure_message_is_bounded() {
        let huge = "x".repeat(100_000);
        let err = AnalysisError::invalid_response(format!("invalid confidence '{huge}'"), &huge);
        let message = err.to_string();
        assert_eq!(
            message,
            format!("Failed to parse AI response. Raw response: {}", "x".repeat(200))
        );
        assert!(err.contract_reason().unwrap().chars().count() <= REASON_CHARS);

        let app: AppError = err.into();
        assert_eq!(app.to_string(), message);
    }

    #[test]
    fn test_provider_error_message() {
        let err = AnalysisError::provider(AiProvider::OpenAi, "timeout");
        assert_eq!(err.to_string(), "OpenAI analysis failed: timeout");

        let app: AppError = err.into();
        assert_eq!(app.to_string(), "OpenAI analysis failed: timeout");
    }
}
