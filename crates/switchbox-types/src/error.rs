//! Error types for parsing loosely-typed wire values.

use thiserror::Error;

/// Errors that can occur when parsing values received from the actuator
/// service or from user input.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Weekday number outside the 0 (Sunday) to 6 (Saturday) range.
    #[error("Invalid weekday number: {0} (expected 0-6)")]
    InvalidWeekday(u8),

    /// Unrecognized recurrence kind string.
    #[error("Unknown recurrence kind: {0:?}")]
    UnknownRecurrence(String),

    /// Clock time that does not match `HH:MM`.
    #[error("Invalid clock time: {0:?} (expected HH:MM)")]
    InvalidTime(String),

    /// Calendar date that does not match `YYYY-MM-DD`.
    #[error("Invalid calendar date: {0:?} (expected YYYY-MM-DD)")]
    InvalidDate(String),
}

/// Result type alias for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;
