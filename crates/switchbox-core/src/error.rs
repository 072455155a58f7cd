//! Error types for the synchronization core.
//!
//! Every round trip against the actuator service collapses into a single
//! [`GatewayError`]: transport failures, non-success status codes, and
//! malformed response bodies. The store catches these locally, reverts any
//! optimistic state, and reports the failure to observers; none of them are
//! retried automatically and none escape as panics.

use thiserror::Error;

use switchbox_types::ParseError;

/// Errors from a gateway round trip against the actuator service.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GatewayError {
    /// The service could not be reached (network failure or timeout).
    #[error("Service not reachable at {url}: {source}")]
    Transport {
        /// The URL that was being requested.
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status code.
    #[error("Service returned HTTP {status}: {message}")]
    Protocol {
        /// The HTTP status code.
        status: u16,
        /// Error message extracted from the response body, if any.
        message: String,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("Malformed response: {0}")]
    Parse(String),

    /// The configured base URL is not usable.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<ParseError> for GatewayError {
    fn from(err: ParseError) -> Self {
        GatewayError::Parse(err.to_string())
    }
}

/// Result type alias for gateway and store operations.
pub type Result<T> = std::result::Result<T, GatewayError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GatewayError::Protocol {
            status: 503,
            message: "device offline".to_string(),
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("device offline"));

        let err = GatewayError::InvalidUrl("localhost:3000".to_string());
        assert!(err.to_string().contains("localhost:3000"));
    }

    #[test]
    fn test_parse_error_conversion() {
        let err: GatewayError = ParseError::InvalidWeekday(9).into();
        assert!(matches!(err, GatewayError::Parse(_)));
        assert!(err.to_string().contains('9'));
    }
}
