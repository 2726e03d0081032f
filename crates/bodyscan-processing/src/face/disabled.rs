use super::{DetectionError, FaceDetector, FaceRegion};
use async_trait::async_trait;
use image::RgbImage;

/// Detector used when no backend is configured. Every call fails.
pub struct DisabledFaceDetector;

#[async_trait]
impl FaceDetector for DisabledFaceDetector {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn detect(&self, _image: &RgbImage) -> Result<Vec<FaceRegion>, DetectionError> {
        Err(DetectionError::Unavailable(
            "face detection is disabled by configuration".to_string(),
        ))
    }
}
