//! # Byte Domain
//!
//! Contract types shared by the Byte bot and API services.
//!
//! This crate contains:
//! - Guild request/response schemas and their validation rules
//! - Health probe payloads
//! - Configuration structures
//! - Domain error types and Result definitions
//!
//! ## Architecture
//! - No dependencies on other Byte crates
//! - Only external dependencies allowed
//! - Pure data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
