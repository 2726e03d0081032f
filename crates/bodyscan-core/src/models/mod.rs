//! Data models for the application
//!
//! Shared between the processing pipeline, the analysis service and the transports.

mod analysis;
mod photo;

pub use analysis::*;
pub use photo::*;
