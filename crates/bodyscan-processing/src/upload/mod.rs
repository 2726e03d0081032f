//! Upload pipeline: validate → normalize → anonymize → encode → store.

pub mod pipeline;

pub use pipeline::{ImagePipeline, PERSISTED_CONTENT_TYPE, PERSISTED_EXTENSION};
