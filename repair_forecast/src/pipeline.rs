//! End-to-end run: densify, split, calibrate, forecast

use crate::calibrate::{Calibration, DecayCalibrator, ScoredRecord};
use crate::config::PipelineConfig;
use crate::data::{item_universe, Observation, TargetRow};
use crate::densify::{DenseSeries, DensifySummary, SeriesDensifier};
use crate::error::{ForecastError, Result};
use crate::forecast::{ForecastRecord, Forecaster};
use crate::split::{EvaluationSet, ValidationSplitter};
use crate::submission::{submission_rows, SubmissionRow};

/// Everything one run produced
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    pub dense: DenseSeries,
    pub densify_summary: DensifySummary,
    pub evaluation: EvaluationSet,
    pub calibration: Calibration,
    /// Evaluation records under each item's chosen k
    pub scored: Vec<ScoredRecord>,
    /// Mean best error over the evaluation window
    pub local_score: Option<f64>,
    /// One forecast per target row, in target order
    pub forecasts: Vec<ForecastRecord>,
}

impl PipelineOutput {
    /// Submission rows for the forecasts
    pub fn submission(&self) -> Result<Vec<SubmissionRow>> {
        submission_rows(&self.forecasts)
    }
}

/// Batch repair forecast over a fixed history window
#[derive(Debug, Clone)]
pub struct RepairForecastPipeline {
    config: PipelineConfig,
}

impl RepairForecastPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run all stages on the sparse observations and the target table.
    ///
    /// The item universe is taken from `targets`. Observations dated outside
    /// the history window mean the window no longer fits the data and abort
    /// the run before calibration.
    pub fn run(&self, observations: &[Observation], targets: &[TargetRow]) -> Result<PipelineOutput> {
        let _span = tracing::info_span!("repair_forecast").entered();

        let items = item_universe(targets);
        if items.is_empty() {
            return Err(ForecastError::DataError(
                "Target table names no items".to_string(),
            ));
        }

        let densifier = SeriesDensifier::new(self.config.history);
        let (dense, densify_summary) = densifier.densify(&items, observations)?;
        if densify_summary.out_of_range > 0 {
            return Err(ForecastError::RangeMismatch(format!(
                "{} observations fall outside history {}..={}",
                densify_summary.out_of_range, self.config.history.start, self.config.history.end
            )));
        }
        if densify_summary.unknown_items > 0 {
            tracing::warn!(
                observations = densify_summary.unknown_items,
                "observations for items absent from the target table were ignored"
            );
        }
        dense.check_invariants(items.len())?;
        tracing::info!(
            items = densify_summary.items,
            months = densify_summary.months,
            rows = dense.len(),
            observed = densify_summary.observed,
            "densified repair history"
        );

        let splitter = ValidationSplitter::new(self.config.split_boundary, self.config.anchor_day);
        let evaluation = splitter.evaluation_set(&dense)?;

        let calibrator = DecayCalibrator::new(&self.config.k_grid, self.config.fallback_k)?;
        let calibration = calibrator.calibrate(dense.items(), &evaluation)?;
        let scored = DecayCalibrator::score(&calibration, &evaluation);
        let local_score = DecayCalibrator::local_score(&scored);
        tracing::info!(
            evaluation_rows = scored.len(),
            dropped = evaluation.dropped.len(),
            local_score = local_score.unwrap_or(f64::NAN),
            "scored evaluation window"
        );

        let forecaster = Forecaster::new(self.config.anchor_day);
        let forecasts = forecaster.forecast(&calibration, &dense, targets)?;

        Ok(PipelineOutput {
            dense,
            densify_summary,
            evaluation,
            calibration,
            scored,
            local_score,
            forecasts,
        })
    }
}
