//! Error types for Thermowatch
//!
//! The analysis pipeline itself is total: once a [`Pipeline`](crate::Pipeline)
//! is built, running it never fails. Errors only arise from invalid
//! configuration and from input validation offered to feed loaders.

use thiserror::Error;

/// Result type alias for Thermowatch operations
pub type Result<T> = std::result::Result<T, ThermoError>;

/// Main error type for Thermowatch operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThermoError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Input validation error
    #[error("Input error: {0}")]
    Input(#[from] InputError),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(String),
}

impl From<serde_json::Error> for ThermoError {
    fn from(err: serde_json::Error) -> Self {
        ThermoError::Json(err.to_string())
    }
}

/// Errors in pipeline configuration
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Window size must hold at least one sample
    #[error("{name} window must hold at least 1 sample")]
    ZeroWindow { name: &'static str },

    /// Numeric constant is NaN, infinite or negative
    #[error("{name} must be finite and non-negative, got {value}")]
    InvalidConstant { name: &'static str, value: f64 },

    /// Warning band bounds are inverted
    #[error("Warning band is inverted: low {low} > high {high}")]
    InvertedBand { low: f64, high: f64 },

    /// Sample interval cannot derive a window
    #[error("Cannot derive a window from {window_ms}ms at {sample_interval_ms}ms sampling")]
    InvalidDuration {
        window_ms: u64,
        sample_interval_ms: u64,
    },
}

/// Errors in a reading feed handed to the pipeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    /// Feed has no readings
    #[error("Feed contains no readings")]
    Empty,

    /// Timestamps are not strictly increasing
    #[error("Timestamp at index {index} ({current_ms}ms) does not follow {previous_ms}ms")]
    NonMonotonic {
        index: usize,
        previous_ms: u64,
        current_ms: u64,
    },

    /// Present value is NaN or infinite
    #[error("Reading at index {index} is not a finite number")]
    NonFinite { index: usize },
}
