//! # vpsie-core
//!
//! Request/response transport core for the VPSie cloud API.
//!
//! Every resource call is a variation on the same exchange: build a request
//! from a method, a path and an optional JSON body, send it, and decode the
//! response or turn it into a typed error. This crate owns that exchange so
//! that resource services only describe paths and payloads.
//!
//! ## Modules
//!
//! - [`client`] - [`ApiClient`], its builder and the unsent [`ApiRequest`]
//! - [`context`] - per-call cancellation and deadlines
//! - [`config`] - transport tuning and application settings
//! - [`error`] - error taxonomy
//! - [`query`] - query-string and pagination helpers
//! - [`transport`] - the pluggable HTTP transport
//! - [`types`] - response envelopes and wire constants

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod query;
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use client::{ApiClient, ApiClientBuilder, ApiRequest};
pub use context::{CancelHandle, RequestContext};
pub use error::{Error, ErrorCategory, Result};
pub use query::ListOptions;
pub use transport::{HttpTransport, TransportResponse};
pub use types::Envelope;
