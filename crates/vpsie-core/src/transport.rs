//! The HTTP transport seam.
//!
//! The core never talks to sockets itself: it hands a fully-formed
//! `reqwest::Request` to an [`HttpTransport`] and gets back the status and the
//! complete body. `reqwest::Client` is the standard implementation; tests
//! substitute their own.

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::error::Result;

/// A response whose body has been read into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Raw response body
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Create a response from a status and body.
    #[must_use]
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Sends requests and reads the full response body.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Execute `request` and return the status and body.
    ///
    /// # Errors
    ///
    /// Returns an error if the exchange fails at the network level.
    async fn send(&self, request: reqwest::Request) -> Result<TransportResponse>;
}

#[async_trait]
impl HttpTransport for reqwest::Client {
    async fn send(&self, request: reqwest::Request) -> Result<TransportResponse> {
        let response = self.execute(request).await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok(TransportResponse::new(status, body.to_vec()))
    }
}
