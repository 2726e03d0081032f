//! Bodyscan Analysis Library
//!
//! Turns an anonymized photo into a validated [`AnalysisResult`](bodyscan_core::models::AnalysisResult):
//! builds the prompt, calls the configured vision model, and enforces the response contract.

pub mod error;
pub mod parser;
pub mod prompt;
pub mod provider;
pub mod service;
pub mod validation;

pub use error::AnalysisError;
pub use parser::{parse_analysis_response, strip_code_fences};
pub use prompt::{AnalysisRequest, ImageAttachment, BASE_PROMPT};
pub use provider::{AnthropicClient, OpenAiClient, ProviderResponse, VisionProvider};
pub use service::{AnalysisOutcome, AnalysisService, MAX_ANGLES};
pub use validation::validate_analysis_result;
