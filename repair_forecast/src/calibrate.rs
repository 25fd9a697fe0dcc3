//! Per-item decay constant calibration
//!
//! Each item is calibrated on its own evaluation records: every candidate k
//! decays the boundary count forward and is scored by mean absolute error
//! against the held-out truth. The lowest score wins; ties go to the
//! smallest k. Results are collected into a fresh map keyed by item, so
//! no item's result depends on another's.

use crate::data::ItemId;
use crate::error::{ForecastError, Result};
use crate::split::{EvaluationRecord, EvaluationSet};
use decay_math::{decay_forward, grid_search, mean_absolute_error, GridSearchOutcome, KGrid};
use std::collections::BTreeMap;

/// How an item's decay constant was obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalibrationSource {
    /// Grid search over the item's evaluation records
    Searched,
    /// Fallback: no count at the split boundary
    MissingCalibrationMonth,
    /// Fallback: no evaluation records to score
    EmptyEvaluationSet,
}

/// Decay constant chosen for one item
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibratedDecay {
    pub k: f64,
    /// Mean absolute error of `k` on the evaluation window, when searched
    pub mean_error: Option<f64>,
    pub source: CalibrationSource,
}

impl CalibratedDecay {
    pub fn is_fallback(&self) -> bool {
        self.source != CalibrationSource::Searched
    }
}

/// Calibrated decay constants keyed by item
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Calibration {
    params: BTreeMap<ItemId, CalibratedDecay>,
}

impl Calibration {
    pub fn get(&self, item_id: &ItemId) -> Option<&CalibratedDecay> {
        self.params.get(item_id)
    }

    /// Decay constant of one item
    pub fn k(&self, item_id: &ItemId) -> Option<f64> {
        self.params.get(item_id).map(|p| p.k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ItemId, &CalibratedDecay)> {
        self.params.iter()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Items calibrated by grid search
    pub fn searched_count(&self) -> usize {
        self.params.values().filter(|p| !p.is_fallback()).count()
    }

    /// Items that received the fallback constant
    pub fn fallback_count(&self) -> usize {
        self.params.values().filter(|p| p.is_fallback()).count()
    }

    /// Fallback items whose evaluation window was empty, as errors
    pub fn empty_evaluation_errors(&self) -> Vec<ForecastError> {
        self.params
            .iter()
            .filter(|(_, p)| p.source == CalibrationSource::EmptyEvaluationSet)
            .map(|(item_id, _)| ForecastError::EmptyEvaluationSet {
                item_id: item_id.clone(),
            })
            .collect()
    }
}

impl FromIterator<(ItemId, CalibratedDecay)> for Calibration {
    fn from_iter<I: IntoIterator<Item = (ItemId, CalibratedDecay)>>(iter: I) -> Self {
        Self {
            params: iter.into_iter().collect(),
        }
    }
}

fn decayed_mae(records: &[&EvaluationRecord], k: f64) -> decay_math::Result<f64> {
    let predicted: Vec<f64> = records
        .iter()
        .map(|r| decay_forward(r.base_count, k, r.months_elapsed))
        .collect();
    let truth: Vec<f64> = records.iter().map(|r| r.truth).collect();
    mean_absolute_error(&predicted, &truth)
}

/// Evaluation record with the prediction of its item's chosen k
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    pub record: EvaluationRecord,
    pub best_k: f64,
    pub best_prediction: f64,
    pub best_error: f64,
}

/// Grid-search calibrator of per-item decay constants
#[derive(Debug, Clone)]
pub struct DecayCalibrator {
    candidates: Vec<f64>,
    fallback_k: f64,
}

impl DecayCalibrator {
    /// Create a calibrator over `grid`, using `fallback_k` for items that cannot be scored
    pub fn new(grid: &KGrid, fallback_k: f64) -> Result<Self> {
        grid.validate()?;
        if !(fallback_k > 0.0 && fallback_k <= 1.0) {
            return Err(ForecastError::InvalidParameter(format!(
                "Fallback k must lie within (0, 1], got {}",
                fallback_k
            )));
        }
        Ok(Self {
            candidates: grid.candidates(),
            fallback_k,
        })
    }

    /// Candidate constants in search order
    pub fn candidates(&self) -> &[f64] {
        &self.candidates
    }

    pub fn fallback_k(&self) -> f64 {
        self.fallback_k
    }

    /// Mean absolute error of decaying each record's base by `k`
    pub fn mean_error(records: &[&EvaluationRecord], k: f64) -> Result<f64> {
        Ok(decayed_mae(records, k)?)
    }

    /// Best candidate for one item's evaluation records
    pub fn best_k(&self, records: &[&EvaluationRecord]) -> Result<GridSearchOutcome> {
        Ok(grid_search(&self.candidates, |k| decayed_mae(records, k))?)
    }

    /// Calibrate every item in `items` against `set`.
    ///
    /// Items dropped by the split or without evaluation records get the
    /// fallback constant and are logged.
    pub fn calibrate<'a, I>(&self, items: I, set: &EvaluationSet) -> Result<Calibration>
    where
        I: IntoIterator<Item = &'a ItemId>,
    {
        let groups = set.by_item();
        let mut params = BTreeMap::new();

        for item_id in items {
            let decay = if set.dropped.contains(item_id) {
                self.fallback(item_id, CalibrationSource::MissingCalibrationMonth)
            } else {
                match groups.get(item_id) {
                    Some(records) if !records.is_empty() => {
                        let outcome = self.best_k(records)?;
                        CalibratedDecay {
                            k: outcome.k,
                            mean_error: Some(outcome.score),
                            source: CalibrationSource::Searched,
                        }
                    }
                    _ => self.fallback(item_id, CalibrationSource::EmptyEvaluationSet),
                }
            };
            params.insert(item_id.clone(), decay);
        }

        let calibration = Calibration { params };
        tracing::info!(
            items = calibration.len(),
            searched = calibration.searched_count(),
            fallback = calibration.fallback_count(),
            "calibrated decay constants"
        );
        Ok(calibration)
    }

    fn fallback(&self, item_id: &ItemId, source: CalibrationSource) -> CalibratedDecay {
        tracing::warn!(
            item_id = %item_id,
            reason = ?source,
            k = self.fallback_k,
            "no scored decay for item, using fallback"
        );
        CalibratedDecay {
            k: self.fallback_k,
            mean_error: None,
            source,
        }
    }

    /// Attach each record's prediction and error under its item's chosen k.
    ///
    /// Records of items missing from `calibration` are skipped.
    pub fn score(calibration: &Calibration, set: &EvaluationSet) -> Vec<ScoredRecord> {
        set.records
            .iter()
            .filter_map(|record| {
                let k = calibration.k(&record.item_id)?;
                let best_prediction = decay_forward(record.base_count, k, record.months_elapsed);
                Some(ScoredRecord {
                    record: record.clone(),
                    best_k: k,
                    best_prediction,
                    best_error: (best_prediction - record.truth).abs(),
                })
            })
            .collect()
    }

    /// Mean best error over all scored records, the local validation score
    pub fn local_score(scored: &[ScoredRecord]) -> Option<f64> {
        if scored.is_empty() {
            return None;
        }
        Some(scored.iter().map(|s| s.best_error).sum::<f64>() / scored.len() as f64)
    }
}
