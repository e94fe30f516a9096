//! Error types for the forecasting core.

use thiserror::Error;

/// Result alias used throughout the forecasting core.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Failures the forecasting core reports to its caller.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// No record carries the requested indicator name.
    #[error("no records found for indicator '{indicator}'")]
    DataNotFound { indicator: String },

    /// Too few distinct years to fit a trend.
    #[error("series '{series}' needs at least {required} distinct years, got {actual}")]
    InsufficientData {
        series: String,
        required: usize,
        actual: usize,
    },

    /// Additive offsets do not line up with the forecast horizon.
    #[error("offset vector has {actual} entries but the horizon has {expected} years")]
    OffsetMismatch { expected: usize, actual: usize },

    /// A source or event pattern in the plan is not a valid regex.
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// No target years were requested.
    #[error("forecast horizon is empty")]
    EmptyHorizon,
}
