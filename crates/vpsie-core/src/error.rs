//! Error types for VPSie operations.
//!
//! Every failure the transport core can produce is a variant of [`Error`].
//! Variants fall into three broad categories (see [`ErrorCategory`]):
//! local configuration problems, failures while building a request, and
//! failures reported by the transport or the remote API.

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for VPSie operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Invalid client configuration (malformed base URL, bad settings)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Relative path could not be resolved against the base URL
    #[error("Invalid request path: {0}")]
    InvalidPath(String),

    /// A default header name or value is not valid HTTP
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Request body failed to serialize to JSON
    #[error("Failed to encode request body: {0}")]
    EncodingFailure(String),

    /// HTTP transport failure
    #[error("HTTP request failed: {0}")]
    HttpError(String),

    /// Remote host could not be reached
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Request deadline elapsed before the exchange completed
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Request was cancelled by the caller
    #[error("Request cancelled: {0}")]
    Cancelled(String),

    /// Non-success status returned by the API
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status of the response
        status: StatusCode,
        /// Provider error code, when the body carried one
        code: Option<i64>,
        /// Provider message, or the local decode error for unreadable bodies
        message: String,
        /// Provider stack trace, when present and non-empty
        stack: Option<String>,
    },

    /// Successful response body did not match the expected shape
    #[error("Failed to decode response ({status}): {message}")]
    DecodeFailure {
        /// HTTP status of the response
        status: StatusCode,
        /// Decoder error message
        message: String,
    },

    /// Response carried no payload where one was required
    #[error("Missing response data: {0}")]
    MissingData(String),
}

/// Specialized result type for VPSie operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Local validation failure, never sent over the wire
    Configuration,
    /// Failure while assembling a request
    Build,
    /// Transport or remote failure
    Api,
}

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigError(_) => "CONFIG_ERROR",
            Self::InvalidPath(_) => "INVALID_PATH",
            Self::InvalidHeader(_) => "INVALID_HEADER",
            Self::EncodingFailure(_) => "ENCODING_FAILURE",
            Self::HttpError(_) => "HTTP_ERROR",
            Self::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            Self::Timeout(_) => "TIMEOUT",
            Self::Cancelled(_) => "CANCELLED",
            Self::Api { .. } => "API_ERROR",
            Self::DecodeFailure { .. } => "DECODE_FAILURE",
            Self::MissingData(_) => "MISSING_DATA",
        }
    }

    /// Returns the category this error belongs to.
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::ConfigError(_) => ErrorCategory::Configuration,
            Self::InvalidPath(_) | Self::InvalidHeader(_) | Self::EncodingFailure(_) => {
                ErrorCategory::Build
            }
            _ => ErrorCategory::Api,
        }
    }

    /// Returns the HTTP status associated with the error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } | Self::DecodeFailure { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if the remote API answered with a 404.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ServiceUnavailable(err.to_string())
        } else {
            Self::HttpError(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::ConfigError(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::ConfigError(err.to_string())
    }
}
