//! Image decoding, normalization, resizing and encoding.

pub mod processor;
pub mod resize;

pub use processor::ImageProcessor;
pub use resize::ImageResize;
