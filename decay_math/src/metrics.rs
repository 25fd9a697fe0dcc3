//! Error metrics for scoring decayed predictions

use crate::{MathError, Result};

/// Absolute difference between a prediction and the observed value
pub fn absolute_error(predicted: f64, actual: f64) -> f64 {
    (predicted - actual).abs()
}

/// Mean absolute error between predicted and actual values.
///
/// An empty input has no defined mean and is reported as
/// [`MathError::InsufficientData`] instead of producing `NaN`.
pub fn mean_absolute_error(predicted: &[f64], actual: &[f64]) -> Result<f64> {
    if predicted.len() != actual.len() {
        return Err(MathError::InvalidInput(format!(
            "Predicted length ({}) doesn't match actual length ({})",
            predicted.len(),
            actual.len()
        )));
    }

    if predicted.is_empty() {
        return Err(MathError::InsufficientData(
            "Mean absolute error needs at least one value".to_string(),
        ));
    }

    let sum: f64 = predicted
        .iter()
        .zip(actual.iter())
        .map(|(&p, &a)| absolute_error(p, a))
        .sum();

    Ok(sum / predicted.len() as f64)
}
