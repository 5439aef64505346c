//! Correlation identifiers for tracing one logical request across services.
//!
//! A [`CorrelationId`] is an opaque string. Generated ids are random UUID v4
//! values (128 bits) in hyphenated form; ids received from a caller are kept
//! verbatim. The same value travels on the [`CORRELATION_HEADER`] header of
//! every attempt of one outbound call and is echoed by the receiving side.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Header carrying the correlation id on requests and responses.
pub const CORRELATION_HEADER: &str = "x-correlation-id";

/// Opaque token identifying one logical request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CorrelationId(String);

impl CorrelationId {
    /// Generate a fresh random id.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Adopt a caller-supplied header value.
    ///
    /// Returns `None` when the value is missing or blank, in which case the
    /// caller should [`generate`](Self::generate) one. Non-blank values are
    /// kept exactly as received.
    pub fn from_header(value: Option<&str>) -> Option<Self> {
        value.filter(|raw| !raw.trim().is_empty()).map(|raw| Self(raw.to_owned()))
    }

    /// Adopt the header value or generate a new id.
    pub fn from_header_or_generate(value: Option<&str>) -> Self {
        Self::from_header(value).unwrap_or_else(Self::generate)
    }

    /// Borrow the id as sent on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the id and return the owned string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CorrelationId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for CorrelationId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl AsRef<str> for CorrelationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_generate_produces_uuid_v4() {
        let id = CorrelationId::generate();
        let parsed = Uuid::parse_str(id.as_str()).unwrap();
        assert_eq!(parsed.get_version_num(), 4);
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let ids: HashSet<_> = (0..1000).map(|_| CorrelationId::generate()).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_from_header_keeps_value_verbatim() {
        let id = CorrelationId::from_header(Some("abc-123")).unwrap();
        assert_eq!(id.as_str(), "abc-123");

        let padded = CorrelationId::from_header(Some(" spaced ")).unwrap();
        assert_eq!(padded.as_str(), " spaced ");
    }

    #[test]
    fn test_from_header_rejects_missing_or_blank() {
        assert!(CorrelationId::from_header(None).is_none());
        assert!(CorrelationId::from_header(Some("")).is_none());
        assert!(CorrelationId::from_header(Some("   ")).is_none());
    }

    #[test]
    fn test_from_header_or_generate() {
        assert_eq!(CorrelationId::from_header_or_generate(Some("keep-me")).as_str(), "keep-me");
        assert!(!CorrelationId::from_header_or_generate(Some("")).as_str().is_empty());
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = CorrelationId::from("abc-123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc-123\"");
    }
}
