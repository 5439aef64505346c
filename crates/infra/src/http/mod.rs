//! Resilient outbound HTTP
//!
//! [`HttpClient::execute`] wraps one logical call in correlation-id
//! injection, a per-attempt timeout, and the retry loop from
//! `byte_common::resilience`.

pub mod client;
pub mod errors;
pub mod request;
pub mod transport;

pub use client::{HttpClient, HttpClientBuilder};
pub use errors::{ClientError, LastFailure};
pub use request::{ApiResponse, RequestSpec};
