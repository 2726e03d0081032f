use image::{imageops, RgbImage};

/// Bounded, aspect-preserving downscaling.
pub struct ImageResize;

impl ImageResize {
    /// Target dimensions so that the longer edge is at most `max_dimension`.
    ///
    /// Never upscales. The shorter edge is rounded to the nearest pixel and is at least 1.
    pub fn bounded_dimensions(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
        if width <= max_dimension && height <= max_dimension {
            return (width, height);
        }

        if width >= height {
            let scaled = (height as f64 * max_dimension as f64 / width as f64).round() as u32;
            (max_dimension, scaled.max(1))
        } else {
            let scaled = (width as f64 * max_dimension as f64 / height as f64).round() as u32;
            (scaled.max(1), max_dimension)
        }
    }

    /// Downscale with Lanczos3 when the longer edge exceeds `max_dimension`.
    pub fn downscale(image: RgbImage, max_dimension: u32) -> RgbImage {
        let (width, height) = image.dimensions();
        let (target_w, target_h) = Self::bounded_dimensions(width, height, max_dimension);
        if (target_w, target_h) == (width, height) {
            return image;
        }
        imageops::resize(&image, target_w, target_h, imageops::FilterType::Lanczos3)
    }
}
