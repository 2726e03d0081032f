//! Bodyscan API Library
//!
//! HTTP surface over the photo intake pipeline and the analysis service.

mod api_doc;
pub mod constants;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod setup;
pub mod state;

pub use api_doc::ApiDoc;
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
