//! Bodyscan Storage Library
//!
//! Storage abstraction for persisted photos plus the local filesystem backend.
//!
//! # Storage key format
//!
//! Every photo lives under `photos/{hex(owner)}_{uuid}.{ext}`. Keys must not contain `..` or a
//! leading `/`. Key and filename generation is centralized in the `keys` module.

pub mod factory;
pub mod keys;
pub mod local;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
pub use keys::{
    encode_owner, generate_photo_filename, generate_storage_key, is_owned_by, photo_id,
    MAX_OWNER_BYTES,
};
pub use local::LocalStorage;
pub use traits::{Storage, StorageError, StorageResult};
