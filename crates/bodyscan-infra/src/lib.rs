//! Bodyscan Infrastructure Library
//!
//! Shared infrastructure used by both binaries:
//! - Middleware (request ID)
//! - Tracing subscriber initialization

pub mod middleware;
pub mod telemetry;

pub use middleware::{get_request_id, request_id_middleware, RequestId, REQUEST_ID_HEADER};
pub use telemetry::{init_basic, LogFormat, LogTarget};
