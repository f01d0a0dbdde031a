//! Shared API types for the Wema donations backend.
//!
//! The [`objects`] module holds every request and response body exchanged
//! with the server. With the `client` feature enabled, [`client`] provides a
//! typed HTTP client and [`flow`] the browser-side donation flow built on it.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![forbid(unsafe_code)]

#[cfg(feature = "client")]
pub mod client;
#[cfg(feature = "client")]
pub mod flow;
pub mod objects;

/// Header carrying a client-chosen idempotency key for donation creation.
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";
