//! Domain constants
//!
//! Validation limits mirror the guild contract shared by both services.

// Guild schema limits
/// Shortest accepted guild name
pub const GUILD_NAME_MIN_LENGTH: usize = 1;
/// Longest accepted guild name
pub const GUILD_NAME_MAX_LENGTH: usize = 100;
/// Shortest accepted command prefix
pub const PREFIX_MIN_LENGTH: usize = 1;
/// Longest accepted command prefix
pub const PREFIX_MAX_LENGTH: usize = 5;
/// Prefix assigned when a create request omits one
pub const DEFAULT_PREFIX: &str = "!";

// Client defaults
/// Base URL of the API service
pub const DEFAULT_API_URL: &str = "http://localhost:8000";
/// Per-attempt timeout
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Total attempts per call
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
/// Delay before the first retry
pub const DEFAULT_BASE_DELAY_MS: u64 = 1_000;
/// Backoff cap
pub const DEFAULT_MAX_DELAY_MS: u64 = 10_000;
/// Jitter mode name
pub const DEFAULT_JITTER: &str = "none";

// Server defaults
/// Listener host
pub const DEFAULT_SERVER_HOST: &str = "127.0.0.1";
/// Listener port
pub const DEFAULT_SERVER_PORT: u16 = 8000;

// Logging defaults
/// Filter directive used when `RUST_LOG` is unset
pub const DEFAULT_LOG_LEVEL: &str = "info";
