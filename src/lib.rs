//! # Repair Forecast Workspace
//!
//! Umbrella crate over the workspace members:
//!
//! - [`decay_math`]: decay primitive, candidate grid and error metrics
//! - [`repair_forecast`]: densify, split, calibrate and forecast repair counts
//!
//! ## Example
//!
//! ```
//! use repair_forecast_workspace::decay_math::decay_forward;
//!
//! let predicted = decay_forward(20.0, 0.9, 2);
//! assert!((predicted - 16.2).abs() < 1e-9);
//! ```

pub use decay_math;
pub use repair_forecast;

pub use repair_forecast::{ForecastError, PipelineConfig, RepairForecastPipeline};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_pipeline_builds() {
        let pipeline = RepairForecastPipeline::new(PipelineConfig::default()).unwrap();
        assert_eq!(pipeline.config().history_months(), 59);
    }
}
