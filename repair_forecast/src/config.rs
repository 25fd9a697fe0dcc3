//! Pipeline configuration
//!
//! Every date window and tuning constant of the forecast lives here so the
//! same code can be pointed at a different history without edits. The
//! [`Default`] values are the ones the repair history was calibrated with.

use crate::error::{ForecastError, Result};
use crate::month::{Month, MonthRange};
use decay_math::KGrid;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// First month of repair history (the first year starts in February)
pub const HISTORY_START: Month = Month::from_parts(2005, 2);
/// Last month of repair history
pub const HISTORY_END: Month = Month::from_parts(2009, 12);
/// Last month of the calibration window
pub const SPLIT_BOUNDARY: Month = Month::from_parts(2009, 8);
/// Day of month used for elapsed-month anchors
pub const ANCHOR_DAY: u32 = 15;
/// Candidate decay constants
pub const K_GRID_START: f64 = 0.87;
pub const K_GRID_END: f64 = 0.95;
pub const K_GRID_STEP: f64 = 0.01;
/// Decay used for items whose evaluation window is empty ("no decay")
pub const FALLBACK_K: f64 = 1.0;

/// Configuration of one forecasting run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Fixed history window, both ends included
    pub history: MonthRange,
    /// Last month of the calibration window; later months are evaluation
    pub split_boundary: Month,
    /// Day of the month preceding the base month used as elapsed-month anchor
    #[serde(default = "default_anchor_day")]
    pub anchor_day: u32,
    /// Candidate decay constants searched per item
    pub k_grid: KGrid,
    /// Decay applied to items that could not be scored
    #[serde(default = "default_fallback_k")]
    pub fallback_k: f64,
}

fn default_anchor_day() -> u32 {
    ANCHOR_DAY
}

fn default_fallback_k() -> f64 {
    FALLBACK_K
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            history: MonthRange {
                start: HISTORY_START,
                end: HISTORY_END,
            },
            split_boundary: SPLIT_BOUNDARY,
            anchor_day: ANCHOR_DAY,
            k_grid: KGrid {
                start: K_GRID_START,
                end: K_GRID_END,
                step: K_GRID_STEP,
            },
            fallback_k: FALLBACK_K,
        }
    }
}

impl PipelineConfig {
    /// Parse a configuration from JSON and validate it
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: PipelineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file and validate it
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    /// Number of months in the history window
    pub fn history_months(&self) -> usize {
        self.history.len()
    }

    /// Check the window and tuning constants for consistency
    pub fn validate(&self) -> Result<()> {
        if self.history.start > self.history.end {
            return Err(ForecastError::InvalidParameter(format!(
                "History start ({}) is after history end ({})",
                self.history.start, self.history.end
            )));
        }
        if !self.history.contains(self.split_boundary) {
            return Err(ForecastError::InvalidParameter(format!(
                "Split boundary {} lies outside history {}..={}",
                self.split_boundary, self.history.start, self.history.end
            )));
        }
        if !(2..=28).contains(&self.anchor_day) {
            return Err(ForecastError::InvalidParameter(format!(
                "Anchor day must be between 2 and 28, got {}",
                self.anchor_day
            )));
        }
        self.k_grid.validate()?;
        if !(self.fallback_k > 0.0 && self.fallback_k <= 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "Fallback k must lie within (0, 1], got {}",
                self.fallback_k
            )));
        }
        Ok(())
    }
}
