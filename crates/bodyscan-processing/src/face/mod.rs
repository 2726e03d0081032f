//! Face detection backends.
//!
//! Detectors report regions in pixel coordinates of the image they were given. Failures are
//! reported as [`DetectionError`]; deciding what a failure means is the anonymizer's job.

mod disabled;
mod rekognition;

pub use disabled::DisabledFaceDetector;
pub use rekognition::RekognitionFaceDetector;

use async_trait::async_trait;
use bodyscan_core::FaceDetectorBackend;
use image::RgbImage;
use std::sync::Arc;
use std::time::Duration;

/// Pixel-space bounding box of a detected face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRegion {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl FaceRegion {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build a region from ratio coordinates (0.0..=1.0 of the image size), as reported by
    /// cloud detectors. Edges snap to the nearest pixel and are clipped to the image.
    pub fn from_ratios(
        left: f32,
        top: f32,
        width: f32,
        height: f32,
        image_width: u32,
        image_height: u32,
    ) -> Option<Self> {
        let x0 = (left as f64 * image_width as f64).round();
        let y0 = (top as f64 * image_height as f64).round();
        let x1 = ((left as f64 + width as f64) * image_width as f64).round();
        let y1 = ((top as f64 + height as f64) * image_height as f64).round();

        let x0 = x0.clamp(0.0, image_width as f64) as u32;
        let y0 = y0.clamp(0.0, image_height as f64) as u32;
        let x1 = x1.clamp(0.0, image_width as f64) as u32;
        let y1 = y1.clamp(0.0, image_height as f64) as u32;

        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Self::new(x0, y0, x1 - x0, y1 - y0))
    }

    /// Intersect with an image of the given size. `None` when nothing is left.
    pub fn clamp_to(&self, image_width: u32, image_height: u32) -> Option<Self> {
        if self.x >= image_width || self.y >= image_height {
            return None;
        }
        let width = self.width.min(image_width - self.x);
        let height = self.height.min(image_height - self.y);
        if width == 0 || height == 0 {
            return None;
        }
        Some(Self::new(self.x, self.y, width, height))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum DetectionError {
    #[error("face detector unavailable: {0}")]
    Unavailable(String),

    #[error("face detection request failed: {0}")]
    Backend(String),

    #[error("face detection timed out after {0:?}")]
    Timeout(Duration),

    #[error("failed to prepare image for face detection: {0}")]
    Encode(String),
}

/// Pluggable face detection backend.
#[async_trait]
pub trait FaceDetector: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Detect faces in an RGB image.
    async fn detect(&self, image: &RgbImage) -> Result<Vec<FaceRegion>, DetectionError>;
}

/// Build the detector selected by configuration.
pub async fn create_face_detector(backend: &FaceDetectorBackend) -> Arc<dyn FaceDetector> {
    match backend {
        FaceDetectorBackend::Rekognition {
            region,
            min_confidence,
        } => {
            tracing::info!(region = %region, min_confidence, "Using AWS Rekognition face detector");
            Arc::new(RekognitionFaceDetector::new(region, *min_confidence).await)
        }
        FaceDetectorBackend::Disabled => {
            tracing::warn!("Face detection is disabled; photos will be stored without blurring");
            Arc::new(DisabledFaceDetector)
        }
    }
}
