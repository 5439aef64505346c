//! # Byte Infrastructure
//!
//! I/O-facing pieces shared by the Byte bot and the API service.
//!
//! This crate contains:
//! - The resilient HTTP client and the typed API client built on it
//! - Configuration loading from environment and files
//! - Axum middleware for request correlation and Prometheus metrics
//! - Tracing subscriber setup
//!
//! ## Architecture
//! - Retry policy, classification and correlation ids come from
//!   `byte-common`
//! - Wire types and settings come from `byte-domain`

pub mod api;
pub mod config;
pub mod http;
pub mod middleware;
pub mod observability;

// Re-export commonly used items
pub use api::{ApiError, ApiErrorCategory, ByteApiClient};
pub use http::{ApiResponse, ClientError, HttpClient, HttpClientBuilder, LastFailure, RequestSpec};
pub use observability::metrics::ApiMetrics;
