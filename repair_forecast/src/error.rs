//! Error types for the repair_forecast crate

use crate::data::ItemId;
use crate::month::Month;
use decay_math::MathError;
use thiserror::Error;

/// Custom error types for the repair_forecast crate
#[derive(Debug, Error)]
pub enum ForecastError {
    /// Error related to data validation or processing
    #[error("Data error: {0}")]
    DataError(String),

    /// Error related to parameter validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Error from invalid parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A month or number could not be parsed
    #[error("Parse error: {0}")]
    ParseError(String),

    /// Item has no calibration row at the split boundary
    #[error("Item {item_id} has no calibration count at boundary month {month}")]
    MissingCalibrationMonth { item_id: ItemId, month: Month },

    /// Item has no evaluation rows, so no decay constant can be scored
    #[error("Item {item_id} has no evaluation rows to score")]
    EmptyEvaluationSet { item_id: ItemId },

    /// Target row whose item has no decay constant or no last known count
    #[error("Target row {row} for item {item_id} has no calibrated decay or last known count")]
    MissingTargetCalibration { item_id: ItemId, row: usize },

    /// The fixed history window does not fit the observed data
    #[error("Range mismatch: {0}")]
    RangeMismatch(String),

    /// Error from decay math
    #[error("Math error: {0}")]
    MathError(#[from] MathError),

    /// Error from IO operations
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Error from CSV reading or writing
    #[error("CSV error: {0}")]
    CsvError(String),

    /// Error from configuration parsing
    #[error("Config error: {0}")]
    ConfigError(String),
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, ForecastError>;

impl From<csv::Error> for ForecastError {
    fn from(err: csv::Error) -> Self {
        ForecastError::CsvError(err.to_string())
    }
}

impl From<serde_json::Error> for ForecastError {
    fn from(err: serde_json::Error) -> Self {
        ForecastError::ConfigError(err.to_string())
    }
}

impl From<std::num::ParseIntError> for ForecastError {
    fn from(err: std::num::ParseIntError) -> Self {
        ForecastError::ParseError(err.to_string())
    }
}
