//! Extrapolation of calibrated decay to the target months

use crate::calibrate::Calibration;
use crate::data::{ItemId, TargetRow};
use crate::densify::DenseSeries;
use crate::error::{ForecastError, Result};
use crate::month::{anchor_for, months_elapsed, Month};
use decay_math::decay_forward;

/// Prediction for one target row
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRecord {
    /// 1-based position of the target row in the target table
    pub row_id: usize,
    pub item_id: ItemId,
    pub month: Month,
    /// Whole months between the anchor and `month`
    pub months_elapsed: u32,
    /// Item's count in the last month of history
    pub base_count: f64,
    /// Item's calibrated decay constant
    pub k: f64,
    pub predicted_count: f64,
}

/// Applies calibrated decay constants to the last known counts
#[derive(Debug, Clone, Copy)]
pub struct Forecaster {
    anchor_day: u32,
}

impl Forecaster {
    pub fn new(anchor_day: u32) -> Self {
        Self { anchor_day }
    }

    /// Predict every target row, in the order given.
    ///
    /// Fails on the first target whose item has no decay constant or no
    /// history, and on targets that do not lie after the history window.
    pub fn forecast(
        &self,
        calibration: &Calibration,
        dense: &DenseSeries,
        targets: &[TargetRow],
    ) -> Result<Vec<ForecastRecord>> {
        let last_month = dense.range().end;
        let anchor = anchor_for(last_month, self.anchor_day)?;

        let forecasts = targets
            .iter()
            .map(|target| {
                let missing = || ForecastError::MissingTargetCalibration {
                    item_id: target.item_id.clone(),
                    row: target.row_id,
                };
                let k = calibration.k(&target.item_id).ok_or_else(missing)?;
                let (_, base_count) = dense.last_known(&target.item_id).ok_or_else(missing)?;

                if target.month <= last_month {
                    return Err(ForecastError::ValidationError(format!(
                        "Target row {} asks for {}, which is not after the last history month {}",
                        target.row_id, target.month, last_month
                    )));
                }
                let elapsed = months_elapsed(anchor, target.month);
                let months_elapsed = u32::try_from(elapsed).map_err(|_| {
                    ForecastError::ValidationError(format!(
                        "Elapsed months {} out of range for target row {}",
                        elapsed, target.row_id
                    ))
                })?;

                Ok(ForecastRecord {
                    row_id: target.row_id,
                    item_id: target.item_id.clone(),
                    month: target.month,
                    months_elapsed,
                    base_count,
                    k,
                    predicted_count: decay_forward(base_count, k, months_elapsed),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::info!(
            targets = forecasts.len(),
            anchor = %anchor,
            "forecast target months"
        );
        Ok(forecasts)
    }
}
