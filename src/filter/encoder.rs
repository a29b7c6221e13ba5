//! Percent-encoding seam for the query rewriter.
//!
//! The rewriter never encodes values directly; it goes through this trait
//! so the drop-on-failure policy stays honored and testable even though
//! the production encoder is total.

use thiserror::Error;

/// Error produced when a value cannot be percent-encoded.
#[derive(Debug, Error)]
#[error("percent-encoding failed: {reason}")]
pub struct EncodeError {
    pub reason: String,
}

/// Query-safe percent-encoder used when rebuilding the login query.
pub trait QueryEncoder: Send + Sync {
    /// Encode a single parameter value for a query-string context.
    fn encode(&self, value: &str) -> Result<String, EncodeError>;
}

/// Strict encoder: every character outside the unreserved set
/// (`A-Za-z0-9-_.~`) is percent-encoded.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrictQueryEncoder;

impl QueryEncoder for StrictQueryEncoder {
    fn encode(&self, value: &str) -> Result<String, EncodeError> {
        Ok(urlencoding::encode(value).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreserved_set_passes_through() {
        let encoded = StrictQueryEncoder.encode("AZaz09-_.~").unwrap();
        assert_eq!(encoded, "AZaz09-_.~");
    }

    #[test]
    fn test_reserved_characters_are_escaped() {
        assert_eq!(
            StrictQueryEncoder.encode("http://x/y").unwrap(),
            "http%3A%2F%2Fx%2Fy"
        );
        assert_eq!(
            StrictQueryEncoder.encode("<Advices/>").unwrap(),
            "%3CAdvices%2F%3E"
        );
        assert_eq!(StrictQueryEncoder.encode("a b+c").unwrap(), "a%20b%2Bc");
    }

    #[test]
    fn test_empty_value_stays_empty() {
        assert_eq!(StrictQueryEncoder.encode("").unwrap(), "");
    }
}
