//! Rust client for the VPSie cloud API.
//!
//! [`VpsieClient`] wraps the transport core from [`vpsie_core`] and exposes
//! one service handle per resource family.
//!
//! ```no_run
//! use vpsie::VpsieClient;
//! use vpsie_core::RequestContext;
//!
//! # async fn run() -> vpsie::Result<()> {
//! let client = VpsieClient::new("my-api-token")?;
//! let keys = client.ssh_keys().list(&RequestContext::background()).await?;
//! println!("{} keys", keys.len());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod services;

pub use client::VpsieClient;
pub use vpsie_core;

/// Result type used throughout the crate.
pub type Result<T> = vpsie_core::Result<T>;
