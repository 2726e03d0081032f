//! Model reply parsing.
//!
//! Converts the raw reply text into an [`AnalysisResult`]. Anything that does not fit the
//! response contract is a hard failure carrying a bounded excerpt of the reply.

use serde::Deserialize;
use serde_json::Value;

use bodyscan_core::models::{
    AnalysisResult, ConfidenceLevel, PhotoQuality, MAX_BODY_FAT_PERCENTAGE,
    MIN_BODY_FAT_PERCENTAGE,
};

use crate::error::AnalysisError;

const FENCE: &str = "```";

#[derive(Debug, Deserialize)]
struct RawAnalysis {
    body_fat_percentage: Value,
    confidence: String,
    reasoning: String,
    photo_quality: String,
    #[serde(default)]
    consistency_check: Option<Value>,
}

/// Trim the reply and drop a surrounding markdown fence, tagged (```json) or bare.
/// Text without fences comes back trimmed and otherwise unchanged.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix(FENCE) {
        // Language tag runs up to the first whitespace, e.g. "json\n{...".
        let tag_len = rest
            .find(|c: char| !c.is_ascii_alphanumeric())
            .unwrap_or(rest.len());
        text = &rest[tag_len..];
    }
    if let Some(rest) = text.strip_suffix(FENCE) {
        text = rest;
    }

    text.trim()
}

/// Parse a model reply into a bounded, one-decimal [`AnalysisResult`].
pub fn parse_analysis_response(raw: &str) -> Result<AnalysisResult, AnalysisError> {
    let json_text = strip_code_fences(raw);
    let parsed: RawAnalysis = serde_json::from_str(json_text)
        .map_err(|e| AnalysisError::invalid_response(e.to_string(), raw))?;

    let percentage = coerce_percentage(&parsed.body_fat_percentage)
        .ok_or_else(|| {
            AnalysisError::invalid_response(
                format!(
                    "body_fat_percentage is not a number: {}",
                    parsed.body_fat_percentage
                ),
                raw,
            )
        })?;

    if !(MIN_BODY_FAT_PERCENTAGE..=MAX_BODY_FAT_PERCENTAGE).contains(&percentage) {
        return Err(AnalysisError::invalid_response(
            format!(
                "body_fat_percentage {} outside {}-{}",
                percentage, MIN_BODY_FAT_PERCENTAGE, MAX_BODY_FAT_PERCENTAGE
            ),
            raw,
        ));
    }

    let confidence: ConfidenceLevel = parsed
        .confidence
        .parse()
        .map_err(|e: String| AnalysisError::invalid_response(e, raw))?;
    let photo_quality: PhotoQuality = parsed
        .photo_quality
        .parse()
        .map_err(|e: String| AnalysisError::invalid_response(e, raw))?;

    let consistency_check = parsed.consistency_check.and_then(|value| match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    });

    Ok(AnalysisResult {
        body_fat_percentage: round_to_tenth(percentage),
        confidence,
        reasoning: parsed.reasoning,
        photo_quality,
        consistency_check,
    })
}

/// Accepts a JSON number or a numeric string such as "18.5" or "18.5%".
fn coerce_percentage(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
