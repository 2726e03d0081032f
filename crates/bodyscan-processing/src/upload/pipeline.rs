//! Upload pipeline: validate → normalize → anonymize → encode → store.
//!
//! Validation is delegated to [`MediaValidator`] so all validation rules live in one place.
//! Size and extension are checked before any decoding, so an oversized or misnamed upload is
//! rejected without touching the detector or storage. Decoding, resizing and encoding run on
//! the blocking pool.

use std::sync::Arc;
use std::time::{Duration, Instant};

use bodyscan_core::models::{RawUpload, StoredPhoto};
use bodyscan_core::ImageConfig;
use bodyscan_storage::{generate_photo_filename, generate_storage_key, is_owned_by, Storage};
use image::RgbImage;

use crate::anonymize::FaceAnonymizer;
use crate::error::ProcessingError;
use crate::face::FaceDetector;
use crate::image::ImageProcessor;
use crate::validator::{MediaValidator, ValidationError};

/// Every stored photo is JPEG regardless of the upload format.
pub const PERSISTED_EXTENSION: &str = "jpg";
pub const PERSISTED_CONTENT_TYPE: &str = "image/jpeg";

pub struct ImagePipeline {
    validator: MediaValidator,
    max_dimension: u32,
    jpeg_quality: u8,
    anonymizer: FaceAnonymizer,
    storage: Arc<dyn Storage>,
}

impl ImagePipeline {
    pub fn new(
        config: &ImageConfig,
        detector: Arc<dyn FaceDetector>,
        storage: Arc<dyn Storage>,
    ) -> Self {
        Self {
            validator: MediaValidator::new(
                config.max_upload_size_bytes,
                config.allowed_extensions.clone(),
            ),
            max_dimension: config.max_dimension,
            jpeg_quality: config.jpeg_quality,
            anonymizer: FaceAnonymizer::new(
                detector,
                config.blur_radius,
                Duration::from_secs(config.face_detection_timeout_secs),
            ),
            storage,
        }
    }

    pub fn validator(&self) -> &MediaValidator {
        &self.validator
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn detector_name(&self) -> &'static str {
        self.anonymizer.detector_name()
    }

    /// Run the full intake pipeline for one upload.
    pub async fn process_upload(&self, upload: RawUpload) -> Result<StoredPhoto, ProcessingError> {
        let start = Instant::now();

        self.validator.validate_file_size(upload.data.len())?;
        self.validator.validate_extension(&upload.filename)?;
        let filename = generate_photo_filename(&upload.owner, PERSISTED_EXTENSION)?;

        let data = upload.data.clone();
        let max_dimension = self.max_dimension;
        let normalized = tokio::task::spawn_blocking(move || -> Result<RgbImage, ValidationError> {
            let decoded = MediaValidator::validate_image_data(&data)?;
            Ok(ImageProcessor::normalize(decoded, max_dimension))
        })
        .await
        .map_err(|e| ProcessingError::Internal(format!("image decode task failed: {}", e)))??;

        let anonymized = self.anonymizer.anonymize(normalized).await;
        let faces_detected = anonymized.faces_detected;
        let is_anonymized = anonymized.is_anonymized();
        let (width, height) = anonymized.image.dimensions();

        let quality = self.jpeg_quality;
        let encoded =
            tokio::task::spawn_blocking(move || ImageProcessor::encode_jpeg(&anonymized.image, quality))
                .await
                .map_err(|e| ProcessingError::Internal(format!("image encode task failed: {}", e)))??;

        let (storage_key, url) = self
            .storage
            .upload(&filename, PERSISTED_CONTENT_TYPE, encoded)
            .await?;
        let file_size = self.storage.content_length(&storage_key).await?;

        tracing::info!(
            owner = %upload.owner,
            original_filename = %upload.filename,
            key = %storage_key,
            width,
            height,
            file_size,
            faces_detected,
            detector = self.anonymizer.detector_name(),
            storage = self.storage.backend_name(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Photo processed and stored"
        );

        Ok(StoredPhoto {
            filename,
            storage_key,
            url,
            width,
            height,
            file_size,
            faces_detected,
            is_anonymized,
        })
    }

    /// Read a stored photo back and re-encode it for the vision model.
    pub async fn load_for_analysis(
        &self,
        owner: &str,
        filename: &str,
    ) -> Result<Vec<u8>, ProcessingError> {
        let key = Self::owned_key(owner, filename)?;
        let data = match self.storage.download(&key).await {
            Ok(data) => data,
            Err(bodyscan_storage::StorageError::NotFound(_)) => {
                return Err(ProcessingError::PhotoNotFound(filename.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        tokio::task::spawn_blocking(move || ImageProcessor::prepare_for_analysis(&data))
            .await
            .map_err(|e| ProcessingError::Internal(format!("image re-encode task failed: {}", e)))?
    }

    /// Remove a stored photo owned by `owner`.
    pub async fn delete_photo(&self, owner: &str, filename: &str) -> Result<(), ProcessingError> {
        let key = Self::owned_key(owner, filename)?;
        if !self.storage.exists(&key).await? {
            return Err(ProcessingError::PhotoNotFound(filename.to_string()));
        }
        self.storage.delete(&key).await?;

        tracing::info!(owner = %owner, key = %key, "Photo deleted");
        Ok(())
    }

    /// Photos of other owners are reported as missing rather than forbidden.
    fn owned_key(owner: &str, filename: &str) -> Result<String, ProcessingError> {
        if filename.contains('/') || filename.contains("..") || !is_owned_by(filename, owner) {
            return Err(ProcessingError::PhotoNotFound(filename.to_string()));
        }
        Ok(generate_storage_key(filename))
    }
}
