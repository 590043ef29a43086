//! Error types for svchours-core.
//!
//! Every variant except [`ServiceHoursError::ParseError`] and
//! [`ServiceHoursError::InvalidTimezone`] signals a caller bug: an interval
//! or day that should have been validated before it reached the core.

use thiserror::Error;

/// The main error type for service-hours operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceHoursError {
    /// Interval whose end lies before its start.
    #[error("Invalid interval: {0}")]
    InvalidInterval(String),

    /// Interval without a start or end where both are required.
    #[error("Missing endpoint: interval has no {0}")]
    MissingEndpoint(&'static str),

    /// Day argument that does not resolve to a calendar day.
    #[error("Invalid day: {0}")]
    InvalidDay(String),

    /// Invalid timezone name provided.
    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    /// Error parsing timestamp or interval input.
    #[error("Parse error: {0}")]
    ParseError(String),
}

/// Result type alias for service-hours operations.
pub type Result<T> = std::result::Result<T, ServiceHoursError>;
