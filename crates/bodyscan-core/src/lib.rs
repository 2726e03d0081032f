//! Bodyscan Core Library
//!
//! This crate provides the configuration value, domain models and error types shared by
//! every bodyscan component.

pub mod config;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{
    AiProvider, AnalysisConfig, Config, FaceDetectorBackend, ImageConfig, ServerConfig,
    StorageConfig,
};
pub use error::{AppError, ErrorMetadata, LogLevel};
