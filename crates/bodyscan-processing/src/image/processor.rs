//! Color normalization and JPEG encoding

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, RgbImage};

use super::resize::ImageResize;
use crate::error::ProcessingError;
use crate::validator::MediaValidator;

/// Quality used when re-encoding a stored photo for the vision model.
pub const ANALYSIS_JPEG_QUALITY: u8 = 95;

pub struct ImageProcessor;

impl ImageProcessor {
    /// Flatten any color mode (palette, grayscale, alpha, 16-bit) to 8-bit RGB and bound the
    /// longer edge to `max_dimension`.
    pub fn normalize(image: DynamicImage, max_dimension: u32) -> RgbImage {
        let rgb = match image {
            DynamicImage::ImageRgb8(rgb) => rgb,
            other => other.to_rgb8(),
        };
        ImageResize::downscale(rgb, max_dimension)
    }

    /// Encode as baseline JPEG at the given quality.
    pub fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, ProcessingError> {
        let mut buf = Vec::new();
        let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
        encoder
            .encode_image(image)
            .map_err(|e| ProcessingError::Encode(e.to_string()))?;
        Ok(buf)
    }

    /// Decode stored bytes, flatten to RGB and re-encode as high-quality JPEG.
    ///
    /// Whatever sits in storage, the vision model always receives `image/jpeg`.
    pub fn prepare_for_analysis(data: &[u8]) -> Result<Vec<u8>, ProcessingError> {
        let decoded = MediaValidator::validate_image_data(data)?;
        let rgb = decoded.to_rgb8();
        Self::encode_jpeg(&rgb, ANALYSIS_JPEG_QUALITY)
    }
}
