//! Typed client for the Byte API service
//!
//! Every method is one named operation on top of
//! [`HttpClient::execute`](crate::http::HttpClient::execute); the operation
//! name labels retry statistics and log records.

pub mod client;
pub mod errors;

pub use client::ByteApiClient;
pub use errors::{ApiError, ApiErrorCategory};
