//! # Repair Forecast
//!
//! Monthly repair forecasting per module/component pair by calibrated
//! exponential decay.
//!
//! ## Stages
//!
//! - **Densify**: sparse (item, month, count) observations become a complete
//!   item × month grid over a fixed history window, zero-filled.
//! - **Split**: months after a boundary are held out; each held-out cell is
//!   paired with the item's count at the boundary.
//! - **Calibrate**: per item, the decay constant `k` from a fixed grid that
//!   minimises mean absolute error of `base * k^n` on the held-out cells.
//! - **Forecast**: each item's last known count is decayed forward to the
//!   requested target months.
//!
//! ## Quick Start
//!
//! ```no_run
//! use repair_forecast::{DataLoader, PipelineConfig, RepairForecastPipeline, SubmissionWriter};
//!
//! let observations = DataLoader::repairs_from_csv("RepairTrain.csv")?;
//! let targets = DataLoader::targets_from_csv("Output_TargetID_Mapping.csv")?;
//!
//! let pipeline = RepairForecastPipeline::new(PipelineConfig::default())?;
//! let output = pipeline.run(&observations, &targets)?;
//!
//! SubmissionWriter::to_csv("submission.csv", &output.submission()?)?;
//! # Ok::<(), repair_forecast::ForecastError>(())
//! ```

pub mod calibrate;
pub mod config;
pub mod data;
pub mod densify;
pub mod error;
pub mod forecast;
pub mod month;
pub mod pipeline;
pub mod split;
pub mod submission;

// Re-export commonly used types
pub use crate::calibrate::{CalibratedDecay, Calibration, CalibrationSource, DecayCalibrator};
pub use crate::config::PipelineConfig;
pub use crate::data::{DataLoader, ItemId, Observation, TargetRow};
pub use crate::densify::{DenseSeries, SeriesDensifier};
pub use crate::error::ForecastError;
pub use crate::forecast::{ForecastRecord, Forecaster};
pub use crate::month::{Month, MonthRange};
pub use crate::pipeline::{PipelineOutput, RepairForecastPipeline};
pub use crate::split::{EvaluationRecord, EvaluationSet, ValidationSplitter};
pub use crate::submission::{SubmissionRow, SubmissionWriter};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
