//! Error types for fallible headless operations.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Reasons a typed date string could not be committed.
pub enum DateInputError {
    /// The input was blank.
    #[error("date input is empty")]
    Empty,
    /// No accepted date format matched the input.
    #[error("unrecognized date `{0}`")]
    Unrecognized(String),
    /// The timezone name is not a known IANA zone.
    #[error("unknown timezone `{0}`")]
    UnknownTimezone(String),
    /// The wall-clock time does not exist in the zone (DST gap).
    #[error("local time `{0}` does not exist in the target timezone")]
    NonexistentLocalTime(String),
}

#[derive(Debug, Error)]
/// Errors raised while loading [`crate::UiConfig`].
pub enum ConfigError {
    /// The JSON payload was malformed or had the wrong shape.
    #[error("ui config parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}
