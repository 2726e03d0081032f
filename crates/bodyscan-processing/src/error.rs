use bodyscan_core::AppError;
use bodyscan_storage::StorageError;

use crate::validator::ValidationError;

/// Errors surfaced by the intake pipeline. Every message starts with "Failed to process image".
#[derive(Debug, thiserror::Error)]
pub enum ProcessingError {
    #[error("Failed to process image: {0}")]
    Validation(#[from] ValidationError),

    #[error("Failed to process image: {0}")]
    Storage(#[from] StorageError),

    #[error("Failed to process image: could not encode JPEG: {0}")]
    Encode(String),

    #[error("Failed to process image: photo not found: {0}")]
    PhotoNotFound(String),

    #[error("Failed to process image: {0}")]
    Internal(String),
}

impl From<ProcessingError> for AppError {
    fn from(err: ProcessingError) -> Self {
        let message = err.to_string();
        match err {
            ProcessingError::Validation(ValidationError::FileTooLarge { .. }) => {
                AppError::PayloadTooLarge(message)
            }
            ProcessingError::Validation(_) => AppError::ImageProcessing(message),
            ProcessingError::PhotoNotFound(_)
            | ProcessingError::Storage(StorageError::NotFound(_)) => AppError::NotFound(message),
            ProcessingError::Storage(StorageError::InvalidKey(_)) => AppError::InvalidInput(message),
            ProcessingError::Storage(_) => AppError::Storage(message),
            ProcessingError::Encode(_) | ProcessingError::Internal(_) => AppError::Internal(message),
        }
    }
}
