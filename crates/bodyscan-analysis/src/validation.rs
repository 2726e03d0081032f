use bodyscan_core::models::{
    AnalysisResult, MAX_BODY_FAT_PERCENTAGE, MIN_BODY_FAT_PERCENTAGE, MIN_REASONING_CHARS,
};

use crate::error::AnalysisError;

/// Acceptance check applied after parsing, before a result is handed to callers.
pub fn validate_analysis_result(result: &AnalysisResult) -> Result<(), AnalysisError> {
    if !(MIN_BODY_FAT_PERCENTAGE..=MAX_BODY_FAT_PERCENTAGE).contains(&result.body_fat_percentage) {
        return Err(AnalysisError::Unacceptable(format!(
            "body fat percentage {} is outside {}-{}",
            result.body_fat_percentage, MIN_BODY_FAT_PERCENTAGE, MAX_BODY_FAT_PERCENTAGE
        )));
    }

    let reasoning_chars = result.reasoning.trim().chars().count();
    if reasoning_chars < MIN_REASONING_CHARS {
        return Err(AnalysisError::Unacceptable(format!(
            "reasoning is too short ({} characters, minimum {})",
            reasoning_chars, MIN_REASONING_CHARS
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bodyscan_core::models::{ConfidenceLevel, PhotoQuality};

    fn result(percentage: f64, reasoning: &str) -> AnalysisResult {
        AnalysisResult {
            body_fat_percentage: percentage,
            confidence: ConfidenceLevel::Medium,
            reasoning: reasoning.to_string(),
            photo_quality: PhotoQuality::Fair,
            consistency_check: None,
        }
    }

    #[test]
    fn test_accepts_substantive_result() {
        assert!(validate_analysis_result(&result(
            18.2,
            "Visible muscle definition, lean physique overall."
        ))
        .is_ok());
    }

    #[test]
    fn test_rejects_terse_reasoning() {
        let err = validate_analysis_result(&result(18.2, "ok")).unwrap_err();
        assert!(matches!(err, AnalysisError::Unacceptable(_)));

        // Padding does not count.
        assert!(validate_analysis_result(&result(18.2, "   short reasoning     ")).is_err());
        assert!(validate_analysis_result(&result(18.2, "exactly twenty chars")).is_ok());
    }

    #[test]
    fn test_rejects_out_of_bounds() {
        assert!(validate_analysis_result(&result(4.9, "A long enough explanation here.")).is_err());
        assert!(validate_analysis_result(&result(50.1, "A long enough explanation here.")).is_err());
    }
}
