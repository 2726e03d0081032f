//! API constants

/// Every route lives under this prefix.
pub const API_PREFIX: &str = "/api";

/// Header carrying the caller's owner identity.
pub const OWNER_HEADER: &str = "X-User-Id";

pub const SERVICE_NAME: &str = "bodyscan-api";

/// Allowance for multipart framing on top of the upload size cap.
pub const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;
