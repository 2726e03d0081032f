use image::{DynamicImage, ImageDecoder, ImageReader};
use std::io::Cursor;
use std::path::Path;

/// Validation errors for uploaded photos
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Image exceeds maximum size of {}MB ({size} bytes)", megabytes(.max))]
    FileTooLarge { size: usize, max: usize },

    #[error("Invalid image format '{extension}'. Allowed: {}", allowed_list(.allowed))]
    InvalidExtension {
        extension: String,
        allowed: Vec<String>,
    },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Empty file")]
    EmptyFile,

    #[error("Invalid or corrupted image: {0}")]
    CorruptImage(String),
}

fn megabytes(bytes: &usize) -> usize {
    bytes / (1024 * 1024)
}

fn allowed_list(allowed: &[String]) -> String {
    allowed.join(", ").to_uppercase()
}

/// Photo upload validator
///
/// Checks run in a fixed order: size, then extension, then structural decoding. The first
/// failing check wins and nothing is written.
#[derive(Debug, Clone)]
pub struct MediaValidator {
    max_file_size: usize,
    allowed_extensions: Vec<String>,
}

impl MediaValidator {
    pub fn new(max_file_size: usize, allowed_extensions: Vec<String>) -> Self {
        Self {
            max_file_size,
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|e| e.trim().trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    pub fn max_file_size(&self) -> usize {
        self.max_file_size
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    /// Validate file size
    pub fn validate_file_size(&self, size: usize) -> Result<(), ValidationError> {
        if size == 0 {
            return Err(ValidationError::EmptyFile);
        }

        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }

        Ok(())
    }

    /// Validate file extension (case-insensitive)
    pub fn validate_extension(&self, filename: &str) -> Result<String, ValidationError> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .ok_or_else(|| ValidationError::InvalidFilename(filename.to_string()))?;

        if !self.allowed_extensions.contains(&extension) {
            return Err(ValidationError::InvalidExtension {
                extension,
                allowed: self.allowed_extensions.clone(),
            });
        }

        Ok(extension)
    }

    /// Decode the payload to prove it is a structurally valid image.
    ///
    /// The format is sniffed from the bytes, not from the extension. EXIF orientation is
    /// applied so the result is upright.
    pub fn validate_image_data(data: &[u8]) -> Result<DynamicImage, ValidationError> {
        let reader = ImageReader::new(Cursor::new(data))
            .with_guessed_format()
            .map_err(|e| ValidationError::CorruptImage(e.to_string()))?;
        if reader.format().is_none() {
            return Err(ValidationError::CorruptImage(
                "unrecognized image format".to_string(),
            ));
        }

        let mut decoder = reader
            .into_decoder()
            .map_err(|e| ValidationError::CorruptImage(e.to_string()))?;
        let orientation = decoder
            .orientation()
            .map_err(|e| ValidationError::CorruptImage(e.to_string()))?;
        let mut img = DynamicImage::from_decoder(decoder)
            .map_err(|e| ValidationError::CorruptImage(e.to_string()))?;
        img.apply_orientation(orientation);

        Ok(img)
    }

    /// Run every check in order and return the decoded image.
    pub fn validate_all(&self, filename: &str, data: &[u8]) -> Result<DynamicImage, ValidationError> {
        self.validate_file_size(data.len())?;
        self.validate_extension(filename)?;
        Self::validate_image_data(data)
    }
}
