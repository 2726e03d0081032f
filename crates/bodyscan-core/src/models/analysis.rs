use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Lowest body-fat percentage a result may carry.
pub const MIN_BODY_FAT_PERCENTAGE: f64 = 5.0;
/// Highest body-fat percentage a result may carry.
pub const MAX_BODY_FAT_PERCENTAGE: f64 = 50.0;
/// Shortest reasoning text the acceptance check lets through.
pub const MIN_REASONING_CHARS: usize = 20;

/// Model-reported confidence in its estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
}

impl ConfidenceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "low",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::High => "high",
        }
    }
}

impl fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfidenceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "low" => Ok(ConfidenceLevel::Low),
            "medium" => Ok(ConfidenceLevel::Medium),
            "high" => Ok(ConfidenceLevel::High),
            other => Err(format!("invalid confidence '{}'", other)),
        }
    }
}

/// Model-reported quality of the submitted photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PhotoQuality {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl PhotoQuality {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoQuality::Poor => "poor",
            PhotoQuality::Fair => "fair",
            PhotoQuality::Good => "good",
            PhotoQuality::Excellent => "excellent",
        }
    }
}

impl fmt::Display for PhotoQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhotoQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "poor" => Ok(PhotoQuality::Poor),
            "fair" => Ok(PhotoQuality::Fair),
            "good" => Ok(PhotoQuality::Good),
            "excellent" => Ok(PhotoQuality::Excellent),
            other => Err(format!("invalid photo_quality '{}'", other)),
        }
    }
}

/// Validated model output. Only built by the response parser.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    /// Estimated body-fat percentage, 5.0 to 50.0, one decimal.
    pub body_fat_percentage: f64,
    pub confidence: ConfidenceLevel,
    pub reasoning: String,
    pub photo_quality: PhotoQuality,
    /// Only present for multi-angle analyses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consistency_check: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_parse_case_insensitively() {
        assert_eq!("High".parse::<ConfidenceLevel>().unwrap(), ConfidenceLevel::High);
        assert_eq!("MEDIUM".parse::<ConfidenceLevel>().unwrap(), ConfidenceLevel::Medium);
        assert!("certain".parse::<ConfidenceLevel>().is_err());

        assert_eq!("Good".parse::<PhotoQuality>().unwrap(), PhotoQuality::Good);
        assert_eq!("excellent".parse::<PhotoQuality>().unwrap(), PhotoQuality::Excellent);
        assert!("blurry".parse::<PhotoQuality>().is_err());
    }

    #[test]
    fn test_result_serialization_omits_missing_consistency_check() {
        let result = AnalysisResult {
            body_fat_percentage: 18.2,
            confidence: ConfidenceLevel::High,
            reasoning: "Visible muscle definition.".to_string(),
            photo_quality: PhotoQuality::Good,
            consistency_check: None,
        };
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["confidence"], "high");
        assert_eq!(json["photo_quality"], "good");
        assert!(json.get("consistency_check").is_none());
    }
}
