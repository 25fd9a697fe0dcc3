//! Dense monthly series from sparse repair observations
//!
//! Every item of the universe gets exactly one count for every month of the
//! fixed history window. Months without a recorded repair count as zero.

use crate::data::{ItemId, Observation};
use crate::error::{ForecastError, Result};
use crate::month::{Month, MonthRange};
use std::collections::BTreeMap;

/// One (item, month) cell of the dense series
#[derive(Debug, Clone, PartialEq)]
pub struct DenseRow {
    pub item_id: ItemId,
    pub month: Month,
    pub repair_count: f64,
}

/// What densification kept and what it left out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DensifySummary {
    /// Items in the series
    pub items: usize,
    /// Months per item
    pub months: usize,
    /// Observations placed into the grid
    pub observed: usize,
    /// Observations of known items dated outside the window
    pub out_of_range: usize,
    /// Observations of items outside the universe
    pub unknown_items: usize,
}

impl DensifySummary {
    /// Rows in the dense series
    pub fn rows(&self) -> usize {
        self.items * self.months
    }
}

/// Complete item × month grid of repair counts
#[derive(Debug, Clone, PartialEq)]
pub struct DenseSeries {
    range: MonthRange,
    counts: BTreeMap<ItemId, Vec<f64>>,
}

impl DenseSeries {
    /// History window covered by every item
    pub fn range(&self) -> MonthRange {
        self.range
    }

    /// Items in ascending order
    pub fn items(&self) -> impl Iterator<Item = &ItemId> {
        self.counts.keys()
    }

    pub fn item_count(&self) -> usize {
        self.counts.len()
    }

    /// Total number of rows (items × months)
    pub fn len(&self) -> usize {
        self.counts.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Monthly counts of one item, oldest first
    pub fn series(&self, item_id: &ItemId) -> Option<&[f64]> {
        self.counts.get(item_id).map(Vec::as_slice)
    }

    /// Count of one item in one month; `None` outside the grid
    pub fn count(&self, item_id: &ItemId, month: Month) -> Option<f64> {
        let offset = self.range.offset_of(month)?;
        self.counts.get(item_id)?.get(offset).copied()
    }

    /// Last month of history and the item's count in it
    pub fn last_known(&self, item_id: &ItemId) -> Option<(Month, f64)> {
        let last = *self.counts.get(item_id)?.last()?;
        Some((self.range.end, last))
    }

    /// All rows sorted by item then month
    pub fn rows(&self) -> impl Iterator<Item = DenseRow> + '_ {
        self.counts.iter().flat_map(move |(item_id, counts)| {
            counts.iter().enumerate().map(move |(i, &repair_count)| DenseRow {
                item_id: item_id.clone(),
                month: self.range.start.offset(i as i64),
                repair_count,
            })
        })
    }

    /// Check the one-row-per-item-per-month invariant against the expected universe size
    pub fn check_invariants(&self, expected_items: usize) -> Result<()> {
        if self.item_count() != expected_items {
            return Err(ForecastError::RangeMismatch(format!(
                "Dense series holds {} items, target table names {}",
                self.item_count(),
                expected_items
            )));
        }
        let expected_rows = self.range.len() * expected_items;
        if self.len() != expected_rows {
            return Err(ForecastError::RangeMismatch(format!(
                "Dense series holds {} rows, expected {} months × {} items = {}",
                self.len(),
                self.range.len(),
                expected_items,
                expected_rows
            )));
        }
        Ok(())
    }
}

/// Builds dense series over a fixed history window
#[derive(Debug, Clone, Copy)]
pub struct SeriesDensifier {
    range: MonthRange,
}

impl SeriesDensifier {
    pub fn new(range: MonthRange) -> Self {
        Self { range }
    }

    /// Place `observations` on the `items` × window grid, zero-filling the rest.
    ///
    /// Observations outside the window or for items outside `items` are left
    /// out and counted in the summary. Two observations for the same cell are
    /// a data error.
    pub fn densify(
        &self,
        items: &[ItemId],
        observations: &[Observation],
    ) -> Result<(DenseSeries, DensifySummary)> {
        let months = self.range.len();
        let mut counts: BTreeMap<ItemId, Vec<f64>> = items
            .iter()
            .map(|item| (item.clone(), vec![0.0; months]))
            .collect();
        let mut filled: BTreeMap<ItemId, Vec<bool>> = items
            .iter()
            .map(|item| (item.clone(), vec![false; months]))
            .collect();

        let mut summary = DensifySummary {
            items: counts.len(),
            months,
            ..DensifySummary::default()
        };

        for obs in observations {
            let (Some(series), Some(seen)) =
                (counts.get_mut(&obs.item_id), filled.get_mut(&obs.item_id))
            else {
                summary.unknown_items += 1;
                continue;
            };
            let Some(offset) = self.range.offset_of(obs.month) else {
                summary.out_of_range += 1;
                continue;
            };
            if !(obs.repair_count >= 0.0 && obs.repair_count.is_finite()) {
                return Err(ForecastError::DataError(format!(
                    "Repair count must be a non-negative number, got {} for {} in {}",
                    obs.repair_count, obs.item_id, obs.month
                )));
            }
            if seen[offset] {
                return Err(ForecastError::DataError(format!(
                    "Duplicate observation for item {} in {}",
                    obs.item_id, obs.month
                )));
            }
            seen[offset] = true;
            series[offset] = obs.repair_count;
            summary.observed += 1;
        }

        tracing::debug!(
            items = summary.items,
            months = summary.months,
            observed = summary.observed,
            out_of_range = summary.out_of_range,
            unknown_items = summary.unknown_items,
            "placed observations on the item-month grid"
        );

        Ok((
            DenseSeries {
                range: self.range,
                counts,
            },
            summary,
        ))
    }
}
