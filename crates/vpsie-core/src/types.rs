//! Wire-level types shared by every VPSie endpoint.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default VPSie API endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.vpsie.com/apps/v2";

/// Header carrying the VPSie API token
pub const AUTH_HEADER: &str = "Vpsie-Auth";

/// Media type used for request and response bodies
pub const MEDIA_TYPE: &str = "application/json";

/// Default `User-Agent` sent by the core
pub const DEFAULT_USER_AGENT: &str = concat!("vpsie-core/", env!("CARGO_PKG_VERSION"));

/// Success envelope wrapped around every VPSie payload.
///
/// ```json
/// { "error": false, "data": { ... }, "total": 3 }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Envelope<T> {
    /// Provider-side error flag, `false` on success
    #[serde(default)]
    pub error: bool,
    /// Wrapped payload
    pub data: Option<T>,
    /// Total item count for list endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
}

impl<T> Envelope<T> {
    /// Unwrap the payload, failing when the provider sent `null` or omitted it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingData`] when `data` is absent.
    pub fn into_data(self, what: &str) -> Result<T> {
        self.data
            .ok_or_else(|| Error::MissingData(format!("{what}: response had no data")))
    }
}

/// Error body returned with non-2xx statuses.
///
/// ```json
/// { "error": true, "code": 404, "message": "not found", "stack": "" }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ErrorBody {
    /// Always `true` for error bodies
    pub error: bool,
    /// Provider error code (usually mirrors the HTTP status)
    pub code: i64,
    /// Human-readable message
    pub message: String,
    /// Server-side stack trace, frequently empty
    pub stack: String,
}
