//! Macro for implementing Display and FromStr for status enums
//!
//! # Example
//!
//! ```rust
//! use byte_domain::impl_domain_status_conversions;
//!
//! #[derive(Debug, Clone, Copy, PartialEq, Eq)]
//! pub enum ProbeState {
//!     Up,
//!     Down,
//! }
//!
//! impl_domain_status_conversions!(ProbeState {
//!     Up => "up",
//!     Down => "down",
//! });
//!
//! assert_eq!(ProbeState::Up.to_string(), "up");
//! assert_eq!("DOWN".parse::<ProbeState>().unwrap(), ProbeState::Down);
//! ```

/// Implements Display and FromStr traits for status enums
///
/// - Display writes the mapped lowercase string
/// - FromStr parses case-insensitively, ignoring surrounding whitespace
#[macro_export]
macro_rules! impl_domain_status_conversions {
    ($enum_name:ident { $($variant:ident => $str:expr),+ $(,)? }) => {
        impl $enum_name {
            /// Stable wire representation
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $str,)+
                }
            }
        }

        impl std::fmt::Display for $enum_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $enum_name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_lowercase().as_str() {
                    $($str => Ok(Self::$variant),)+
                    _ => Err(format!("Invalid {}: {}", stringify!($enum_name), s)),
                }
            }
        }
    };
}
