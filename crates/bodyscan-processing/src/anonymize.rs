//! Face anonymization.
//!
//! Detection failure never fails the upload: the anonymizer logs it and hands back the image
//! untouched with a face count of zero. Every region the detector does report is blurred
//! before the image leaves this module.

use image::{imageops, RgbImage};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::face::{DetectionError, FaceDetector, FaceRegion};

/// Result of anonymization. Always produced, even when detection failed.
#[derive(Debug, Clone)]
pub struct AnonymizedImage {
    pub image: RgbImage,
    pub faces_detected: usize,
}

impl AnonymizedImage {
    pub fn is_anonymized(&self) -> bool {
        self.faces_detected > 0
    }
}

pub struct FaceAnonymizer {
    detector: Arc<dyn FaceDetector>,
    blur_radius: f32,
    timeout: Duration,
}

impl FaceAnonymizer {
    pub fn new(detector: Arc<dyn FaceDetector>, blur_radius: f32, timeout: Duration) -> Self {
        Self {
            detector,
            blur_radius,
            timeout,
        }
    }

    pub fn detector_name(&self) -> &'static str {
        self.detector.name()
    }

    /// Detect faces and blur each one in place.
    pub async fn anonymize(&self, mut image: RgbImage) -> AnonymizedImage {
        let start = Instant::now();

        let regions = match self.detect(&image).await {
            Ok(regions) => regions,
            Err(e) => {
                tracing::warn!(
                    detector = self.detector.name(),
                    error = %e,
                    "Face detection failed, continuing without anonymization"
                );
                return AnonymizedImage {
                    image,
                    faces_detected: 0,
                };
            }
        };

        let faces_detected = regions.len();
        blur_regions(&mut image, &regions, self.blur_radius);

        tracing::debug!(
            detector = self.detector.name(),
            faces_detected,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Face anonymization completed"
        );

        AnonymizedImage {
            image,
            faces_detected,
        }
    }

    async fn detect(&self, image: &RgbImage) -> Result<Vec<FaceRegion>, DetectionError> {
        match tokio::time::timeout(self.timeout, self.detector.detect(image)).await {
            Ok(result) => result,
            Err(_) => Err(DetectionError::Timeout(self.timeout)),
        }
    }
}

/// Blur each region independently: crop, Gaussian blur, paste back at the same coordinates.
///
/// Regions are clipped to the image first; a region entirely outside the image is skipped.
pub fn blur_regions(image: &mut RgbImage, regions: &[FaceRegion], radius: f32) {
    let (width, height) = image.dimensions();
    for region in regions {
        let Some(r) = region.clamp_to(width, height) else {
            continue;
        };
        let crop = imageops::crop_imm(image, r.x, r.y, r.width, r.height).to_image();
        let blurred = imageops::blur(&crop, radius);
        imageops::replace(image, &blurred, r.x as i64, r.y as i64);
    }
}
