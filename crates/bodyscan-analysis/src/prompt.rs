//! Model-facing instructions and the provider-agnostic request payload.

use base64::Engine;
use bodyscan_core::models::PhotoType;

/// Default single-photo instruction.
pub const BASE_PROMPT: &str = r#"You are an expert body composition analyst. Analyze this photo and provide:

1. Estimated body fat percentage (as a number between 5-50)
2. Confidence level in your estimate (low/medium/high)
3. Brief explanation of your reasoning (2-3 sentences)

Important:
- This is for informational purposes only, not medical advice
- Focus on visible indicators: muscle definition, body proportions, overall physique
- Be objective and professional
- If the photo quality is poor or angle is bad, note this in confidence level

Return ONLY a JSON object with this exact structure:
{
    "body_fat_percentage": <number>,
    "confidence": "<low/medium/high>",
    "reasoning": "<your explanation>",
    "photo_quality": "<poor/fair/good/excellent>"
}"#;

const MULTI_ANGLE_INTRO: &str =
    "You are an expert body composition analyst looking at several photos of the same person taken from different angles.";

const MULTI_ANGLE_BODY: &str = r#"Provide one body composition analysis that takes every angle into account.

Return ONLY a JSON object with this exact structure:
{
    "body_fat_percentage": <number>,
    "confidence": "<low/medium/high>",
    "reasoning": "<your explanation considering all angles>",
    "photo_quality": "<poor/fair/good/excellent>",
    "consistency_check": "<are the photos consistent with each other?>"
}"#;

/// Build the multi-angle instruction, listing the angles in the order the images are attached.
pub fn multi_angle_prompt(angles: &[PhotoType]) -> String {
    let listed = angles
        .iter()
        .enumerate()
        .map(|(i, angle)| format!("- Photo {}: {} view", i + 1, angle))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        "{}\n\nPhotos provided:\n{}\n\n{}",
        MULTI_ANGLE_INTRO, listed, MULTI_ANGLE_BODY
    )
}

/// Inlined image sent alongside the instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub media_type: String,
    pub data: Vec<u8>,
}

impl ImageAttachment {
    /// JPEG attachment. Stored photos are always re-encoded to JPEG before analysis.
    pub fn jpeg(data: Vec<u8>) -> Self {
        Self {
            media_type: "image/jpeg".to_string(),
            data,
        }
    }

    pub fn base64(&self) -> String {
        base64::engine::general_purpose::STANDARD.encode(&self.data)
    }

    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.base64())
    }
}

/// One instruction block plus one or more inlined images.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub instruction: String,
    pub images: Vec<ImageAttachment>,
}

impl AnalysisRequest {
    /// Single photo with the default instruction, or `prompt` when one is supplied.
    pub fn single(image: Vec<u8>, prompt: Option<&str>) -> Self {
        Self {
            instruction: resolve_prompt(prompt).unwrap_or_else(|| BASE_PROMPT.to_string()),
            images: vec![ImageAttachment::jpeg(image)],
        }
    }

    /// Several photos of one person, attached in the given order.
    pub fn multi_angle(images: Vec<(PhotoType, Vec<u8>)>, prompt: Option<&str>) -> Self {
        let angles: Vec<PhotoType> = images.iter().map(|(angle, _)| *angle).collect();
        Self {
            instruction: resolve_prompt(prompt).unwrap_or_else(|| multi_angle_prompt(&angles)),
            images: images
                .into_iter()
                .map(|(_, data)| ImageAttachment::jpeg(data))
                .collect(),
        }
    }
}

/// A blank override falls back to the default instruction.
fn resolve_prompt(prompt: Option<&str>) -> Option<String> {
    prompt
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prompt_fixes_output_shape() {
        let request = AnalysisRequest::single(vec![1, 2, 3], None);
        assert_eq!(request.instruction, BASE_PROMPT);
        assert!(request
            .instruction
            .contains("Return ONLY a JSON object with this exact structure"));
        for key in ["body_fat_percentage", "confidence", "reasoning", "photo_quality"] {
            assert!(request.instruction.contains(key));
        }
        assert_eq!(request.images.len(), 1);
        assert_eq!(request.images[0].media_type, "image/jpeg");
    }

    #[test]
    fn test_override_replaces_prompt() {
        let request = AnalysisRequest::single(vec![1], Some("Just the number please"));
        assert_eq!(request.instruction, "Just the number please");

        let request = AnalysisRequest::single(vec![1], Some("   "));
        assert_eq!(request.instruction, BASE_PROMPT);
    }

    #[test]
    fn test_multi_angle_prompt_lists_angles_in_order() {
        let request = AnalysisRequest::multi_angle(
            vec![(PhotoType::Front, vec![1]), (PhotoType::Side, vec![2])],
            None,
        );
        assert_eq!(request.images.len(), 2);
        assert_eq!(request.images[1].data, vec![2]);
        let front = request.instruction.find("Photo 1: front view").unwrap();
        let side = request.instruction.find("Photo 2: side view").unwrap();
        assert!(front < side);
        assert!(request.instruction.contains("consistency_check"));
    }

    #[test]
    fn test_data_url() {
        let attachment = ImageAttachment::jpeg(b"abc".to_vec());
        assert_eq!(attachment.data_url(), "data:image/jpeg;base64,YWJj");
    }
}
