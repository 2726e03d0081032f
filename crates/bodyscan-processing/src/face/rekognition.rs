use super::{DetectionError, FaceDetector, FaceRegion};
use crate::image::ImageProcessor;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::primitives::Blob;
use aws_sdk_rekognition::types::{Attribute, FaceDetail, Image};
use aws_sdk_rekognition::Client as RekognitionClient;
use image::RgbImage;

/// JPEG quality of the copy uploaded to Rekognition. Only used for detection.
const DETECTION_JPEG_QUALITY: u8 = 90;

/// AWS Rekognition `DetectFaces` backend.
pub struct RekognitionFaceDetector {
    client: RekognitionClient,
    min_confidence: f32,
}

impl RekognitionFaceDetector {
    /// Create a detector using the default AWS credential chain for the given region.
    pub async fn new(region: &str, min_confidence: f32) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;

        Self {
            client: RekognitionClient::new(&config),
            min_confidence,
        }
    }

    /// Convert Rekognition face details to pixel regions, dropping low-confidence and
    /// off-image boxes.
    fn to_regions(
        details: &[FaceDetail],
        min_confidence: f32,
        width: u32,
        height: u32,
    ) -> Vec<FaceRegion> {
        details
            .iter()
            .filter(|face| face.confidence().unwrap_or(0.0) >= min_confidence)
            .filter_map(|face| {
                let bbox = face.bounding_box()?;
                FaceRegion::from_ratios(
                    bbox.left().unwrap_or(0.0),
                    bbox.top().unwrap_or(0.0),
                    bbox.width()?,
                    bbox.height()?,
                    width,
                    height,
                )
            })
            .collect()
    }
}

#[async_trait]
impl FaceDetector for RekognitionFaceDetector {
    fn name(&self) -> &'static str {
        "aws-rekognition"
    }

    async fn detect(&self, image: &RgbImage) -> Result<Vec<FaceRegion>, DetectionError> {
        let (width, height) = image.dimensions();
        let jpeg = ImageProcessor::encode_jpeg(image, DETECTION_JPEG_QUALITY)
            .map_err(|e| DetectionError::Encode(e.to_string()))?;

        let response = self
            .client
            .detect_faces()
            .image(Image::builder().bytes(Blob::new(jpeg)).build())
            .attributes(Attribute::Default)
            .send()
            .await
            .map_err(|e| DetectionError::Backend(DisplayErrorContext(&e).to_string()))?;

        let regions = Self::to_regions(response.face_details(), self.min_confidence, width, height);

        tracing::debug!(
            detector = self.name(),
            raw_faces = response.face_details().len(),
            faces = regions.len(),
            "Rekognition face detection completed"
        );

        Ok(regions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_rekognition::types::BoundingBox;

    fn face(left: f32, top: f32, w: f32, h: f32, confidence: f32) -> FaceDetail {
        FaceDetail::builder()
            .bounding_box(
                BoundingBox::builder()
                    .left(left)
                    .top(top)
                    .width(w)
                    .height(h)
                    .build(),
            )
            .confidence(confidence)
            .build()
    }

    #[test]
    fn test_to_regions_filters_confidence() {
        let details = vec![
            face(0.1, 0.1, 0.2, 0.2, 99.0),
            face(0.5, 0.5, 0.2, 0.2, 40.0),
        ];
        let regions = RekognitionFaceDetector::to_regions(&details, 80.0, 1000, 500);
        assert_eq!(regions, vec![FaceRegion::new(100, 50, 200, 100)]);
    }

    #[test]
    fn test_to_regions_skips_missing_boxes() {
        let details = vec![FaceDetail::builder().confidence(99.0).build()];
        assert!(RekognitionFaceDetector::to_regions(&details, 80.0, 100, 100).is_empty());
    }
}
