//! # Decay Math
//!
//! Numeric building blocks for decay-based repair forecasting.
//! This crate provides the exponential decay primitive, the grid of
//! candidate decay constants and the error metrics used to score them.

use thiserror::Error;

pub mod decay;
pub mod grid;
pub mod metrics;

pub use decay::decay_forward;
pub use grid::{grid_search, GridSearchOutcome, KGrid, MAX_CANDIDATES};
pub use metrics::{absolute_error, mean_absolute_error};

/// Errors that can occur in decay calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Insufficient data for calculation: {0}")]
    InsufficientData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

/// Result type for decay math operations
pub type Result<T> = std::result::Result<T, MathError>;
