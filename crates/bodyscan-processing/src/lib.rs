//! Bodyscan Processing Library
//!
//! Image intake pipeline for uploaded photos: validation, normalization, face anonymization,
//! JPEG encoding and persistence.

pub mod anonymize;
pub mod error;
pub mod face;
pub mod image;
pub mod upload;
pub mod validator;

pub use anonymize::{AnonymizedImage, FaceAnonymizer};
pub use error::ProcessingError;
pub use face::{create_face_detector, DetectionError, FaceDetector, FaceRegion};
pub use image::{ImageProcessor, ImageResize};
pub use upload::ImagePipeline;
pub use validator::{MediaValidator, ValidationError};
