//! Shared key and filename generation for storage backends.
//!
//! Filename format: `{hex(owner)}_{uuid}.{ext}`. Key format: `photos/{filename}`.

use uuid::Uuid;

use crate::traits::{StorageError, StorageResult};

const KEY_PREFIX: &str = "photos";

/// Longest owner identifier accepted, in bytes. Keeps generated filenames well under common
/// filesystem name limits once hex-encoded.
pub const MAX_OWNER_BYTES: usize = 64;

/// Filename-safe, lossless form of an owner identifier.
///
/// Distinct owners always encode differently, so the filename prefix alone decides ownership.
pub fn encode_owner(owner: &str) -> String {
    hex::encode(owner.as_bytes())
}

/// Generate a collision-resistant filename for an owner's photo.
pub fn generate_photo_filename(owner: &str, extension: &str) -> StorageResult<String> {
    if owner.is_empty() {
        return Err(StorageError::InvalidKey("owner identifier is empty".to_string()));
    }
    if owner.len() > MAX_OWNER_BYTES {
        return Err(StorageError::InvalidKey(format!(
            "owner identifier exceeds {} bytes",
            MAX_OWNER_BYTES
        )));
    }

    Ok(format!(
        "{}_{}.{}",
        encode_owner(owner),
        Uuid::new_v4(),
        extension.trim_start_matches('.')
    ))
}

/// Storage key for a photo filename.
pub fn generate_storage_key(filename: &str) -> String {
    format!("{}/{}", KEY_PREFIX, filename)
}

/// The uuid embedded in a generated photo filename.
pub fn photo_id(filename: &str) -> Option<Uuid> {
    let (_, rest) = filename.rsplit_once('_')?;
    let (token, _ext) = rest.split_once('.')?;
    Uuid::parse_str(token).ok()
}

/// Whether `filename` was generated for `owner`.
///
/// The owner prefix is compared byte for byte against the encoded caller, so identifiers that
/// differ only in punctuation or case never share photos.
pub fn is_owned_by(filename: &str, owner: &str) -> bool {
    match filename.rsplit_once('_') {
        Some((prefix, _)) => prefix == encode_owner(owner) && photo_id(filename).is_some(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_photo_filename_is_unique_and_owned() {
        let a = generate_photo_filename("user-42", "jpg").unwrap();
        let b = generate_photo_filename("user-42", ".jpg").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("757365722d3432_"));
        assert!(a.ends_with(".jpg"));
        assert!(b.ends_with(".jpg") && !b.ends_with("..jpg"));
        assert!(is_owned_by(&a, "user-42"));
        assert!(!is_owned_by(&a, "user-4"));
        assert!(photo_id(&a).is_some());
        assert_ne!(photo_id(&a), photo_id(&b));
        assert_eq!(photo_id("user-42_not-a-uuid.jpg"), None);
    }

    #[test]
    fn test_encode_owner_is_filename_safe() {
        assert_eq!(encode_owner("../../etc"), "2e2e2f2e2e2f657463");
        assert!(encode_owner("alice@example.com")
            .chars()
            .all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_owner_length_and_emptiness_checked() {
        assert!(matches!(
            generate_photo_filename("", "jpg"),
            Err(StorageError::InvalidKey(_))
        ));
        let long = "a".repeat(MAX_OWNER_BYTES + 1);
        assert!(matches!(
            generate_photo_filename(&long, "jpg"),
            Err(StorageError::InvalidKey(_))
        ));
        let longest = "a".repeat(MAX_OWNER_BYTES);
        let file = generate_photo_filename(&longest, "jpg").unwrap();
        assert!(file.len() < 255);
        assert!(is_owned_by(&file, &longest));
    }

    #[test]
    fn test_is_owned_by_rejects_prefix_collisions() {
        let file = generate_photo_filename("bob_smith", "jpg").unwrap();
        assert!(is_owned_by(&file, "bob_smith"));
        assert!(!is_owned_by(&file, "bob"));
        assert!(!is_owned_by("bob_notauuid.jpg", "bob"));
        assert!(!is_owned_by("bob.jpg", "bob"));
    }

    #[test]
    fn test_is_owned_by_distinguishes_owners_differing_in_punctuation() {
        let file = generate_photo_filename("alice@example.com", "jpg").unwrap();
        assert!(is_owned_by(&file, "alice@example.com"));
        assert!(!is_owned_by(&file, "alice.example.com"));
        assert!(!is_owned_by(&file, "aliceexamplecom"));
        assert!(!is_owned_by(&file, "Alice@example.com"));

        let symbols = generate_photo_filename("@@@", "jpg").unwrap();
        assert!(is_owned_by(&symbols, "@@@"));
        assert!(!is_owned_by(&symbols, "!!!"));
        assert!(!is_owned_by(&symbols, "anonymous"));
    }

    #[test]
    fn test_generate_storage_key() {
        assert_eq!(generate_storage_key("a_b.jpg"), "photos/a_b.jpg");
    }
}
