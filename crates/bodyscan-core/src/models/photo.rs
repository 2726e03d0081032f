use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Raw upload as delivered by a transport. Never persisted as-is.
#[derive(Debug, Clone)]
pub struct RawUpload {
    pub filename: String,
    pub data: Bytes,
    pub owner: String,
}

impl RawUpload {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>, owner: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            data: data.into(),
            owner: owner.into(),
        }
    }
}

/// Persisted, anonymized photo. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StoredPhoto {
    /// Final file name, `{hex(owner)}_{uuid}.jpg`.
    pub filename: String,
    /// Storage key (path relative to the storage root).
    pub storage_key: String,
    pub url: String,
    pub width: u32,
    pub height: u32,
    /// Encoded size on disk, in bytes.
    pub file_size: u64,
    pub faces_detected: usize,
    pub is_anonymized: bool,
}

/// Which angle a photo was taken from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PhotoType {
    #[default]
    Front,
    Side,
    Back,
    Other,
}

impl PhotoType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhotoType::Front => "front",
            PhotoType::Side => "side",
            PhotoType::Back => "back",
            PhotoType::Other => "other",
        }
    }
}

impl fmt::Display for PhotoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PhotoType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "front" => Ok(PhotoType::Front),
            "side" => Ok(PhotoType::Side),
            "back" => Ok(PhotoType::Back),
            "other" => Ok(PhotoType::Other),
            other => Err(format!(
                "Invalid photo type '{}'. Allowed: front, side, back, other",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_photo_type_parse() {
        assert_eq!("SIDE".parse::<PhotoType>().unwrap(), PhotoType::Side);
        assert_eq!(" back".parse::<PhotoType>().unwrap(), PhotoType::Back);
        assert!("top".parse::<PhotoType>().is_err());
        assert_eq!(PhotoType::default(), PhotoType::Front);
    }

    #[test]
    fn test_stored_photo_serializes_flat() {
        let photo = StoredPhoto {
            filename: "alice_1.jpg".to_string(),
            storage_key: "photos/alice_1.jpg".to_string(),
            url: "/uploads/photos/alice_1.jpg".to_string(),
            width: 2048,
            height: 1536,
            file_size: 1234,
            faces_detected: 1,
            is_anonymized: true,
        };
        let json = serde_json::to_value(&photo).unwrap();
        assert_eq!(json["width"], 2048);
        assert_eq!(json["is_anonymized"], true);
    }
}
