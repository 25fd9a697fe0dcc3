//! Calibration / evaluation split of the dense series
//!
//! Months up to and including the boundary form the calibration window.
//! Each later month becomes an evaluation record whose prediction base is
//! the item's count at the boundary month, so nothing from the evaluation
//! window leaks into the base.

use crate::data::ItemId;
use crate::densify::{DenseRow, DenseSeries};
use crate::error::{ForecastError, Result};
use crate::month::{anchor_for, months_elapsed, Month};
use std::collections::BTreeMap;

/// One held-out (item, month) cell with its prediction base
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationRecord {
    pub item_id: ItemId,
    pub month: Month,
    /// Whole months between the anchor and `month`
    pub months_elapsed: u32,
    /// Observed repair count in `month`
    pub truth: f64,
    /// Item's count at the boundary month
    pub base_count: f64,
}

/// Evaluation records of every item that could be based at the boundary
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EvaluationSet {
    /// Records sorted by item then month
    pub records: Vec<EvaluationRecord>,
    /// Items without a count at the boundary month
    pub dropped: Vec<ItemId>,
    /// Boundary the set was split at
    pub boundary: Option<Month>,
}

impl EvaluationSet {
    /// Records grouped per item
    pub fn by_item(&self) -> BTreeMap<&ItemId, Vec<&EvaluationRecord>> {
        let mut groups: BTreeMap<&ItemId, Vec<&EvaluationRecord>> = BTreeMap::new();
        for record in &self.records {
            groups.entry(&record.item_id).or_default().push(record);
        }
        groups
    }

    /// The dropped items as [`ForecastError::MissingCalibrationMonth`] values
    pub fn dropped_errors(&self) -> Vec<ForecastError> {
        match self.boundary {
            Some(month) => self
                .dropped
                .iter()
                .map(|item_id| ForecastError::MissingCalibrationMonth {
                    item_id: item_id.clone(),
                    month,
                })
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Splits a dense series at a fixed boundary month
#[derive(Debug, Clone, Copy)]
pub struct ValidationSplitter {
    boundary: Month,
    anchor_day: u32,
}

impl ValidationSplitter {
    /// `boundary` is the last calibration month
    pub fn new(boundary: Month, anchor_day: u32) -> Self {
        Self {
            boundary,
            anchor_day,
        }
    }

    pub fn boundary(&self) -> Month {
        self.boundary
    }

    /// Rows up to the boundary and rows after it
    pub fn partition(&self, dense: &DenseSeries) -> (Vec<DenseRow>, Vec<DenseRow>) {
        dense.rows().partition(|row| row.month <= self.boundary)
    }

    /// Build evaluation records for every item.
    ///
    /// An item with no count at the boundary month loses all its evaluation
    /// rows; it is listed in [`EvaluationSet::dropped`] and logged.
    pub fn evaluation_set(&self, dense: &DenseSeries) -> Result<EvaluationSet> {
        let anchor = anchor_for(self.boundary, self.anchor_day)?;
        let range = dense.range();
        let mut set = EvaluationSet {
            boundary: Some(self.boundary),
            ..EvaluationSet::default()
        };

        for item_id in dense.items() {
            let Some(base_count) = dense.count(item_id, self.boundary) else {
                tracing::warn!(
                    item_id = %item_id,
                    boundary = %self.boundary,
                    "item has no calibration count at the boundary month, dropped from evaluation"
                );
                set.dropped.push(item_id.clone());
                continue;
            };

            for month in range.iter().filter(|m| *m > self.boundary) {
                let Some(truth) = dense.count(item_id, month) else {
                    continue;
                };
                let elapsed = months_elapsed(anchor, month);
                let months_elapsed = u32::try_from(elapsed).map_err(|_| {
                    ForecastError::ValidationError(format!(
                        "Negative elapsed months ({}) for {} from anchor {}",
                        elapsed, month, anchor
                    ))
                })?;
                set.records.push(EvaluationRecord {
                    item_id: item_id.clone(),
                    month,
                    months_elapsed,
                    truth,
                    base_count,
                });
            }
        }

        tracing::debug!(
            boundary = %self.boundary,
            records = set.records.len(),
            dropped = set.dropped.len(),
            "built evaluation set"
        );

        Ok(set)
    }
}
