//! Candidate grid of decay constants and the search over it

use crate::{MathError, Result};
use serde::{Deserialize, Serialize};

/// Grid points are snapped to this resolution so that `0.87 + 3 * 0.01`
/// compares equal to the literal `0.90`.
const GRID_RESOLUTION: f64 = 1e9;

/// Largest number of candidates a grid may hold
pub const MAX_CANDIDATES: usize = 10_000;

/// Evenly spaced, inclusive grid of candidate decay constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KGrid {
    /// Smallest candidate
    pub start: f64,
    /// Largest candidate, included when reachable from `start` in whole steps
    pub end: f64,
    /// Spacing between candidates
    pub step: f64,
}

impl KGrid {
    /// Create a new grid over `[start, end]` with the given spacing
    pub fn new(start: f64, end: f64, step: f64) -> Result<Self> {
        let grid = Self { start, end, step };
        grid.validate()?;
        Ok(grid)
    }

    /// Check that the grid describes decay constants in `(0, 1]`
    pub fn validate(&self) -> Result<()> {
        if !(self.start.is_finite() && self.end.is_finite() && self.step.is_finite()) {
            return Err(MathError::InvalidInput(
                "Grid bounds and step must be finite".to_string(),
            ));
        }
        if self.step <= 0.0 {
            return Err(MathError::InvalidInput(format!(
                "Grid step must be positive, got {}",
                self.step
            )));
        }
        if self.start <= 0.0 || self.end > 1.0 {
            return Err(MathError::InvalidInput(format!(
                "Grid [{}, {}] must lie within (0, 1]",
                self.start, self.end
            )));
        }
        if self.start > self.end {
            return Err(MathError::InvalidInput(format!(
                "Grid start ({}) is greater than end ({})",
                self.start, self.end
            )));
        }
        let steps = ((self.end - self.start) / self.step + 1e-9).floor();
        if steps + 1.0 > MAX_CANDIDATES as f64 {
            return Err(MathError::InvalidInput(format!(
                "Grid [{}, {}] with step {} exceeds {} candidates",
                self.start, self.end, self.step, MAX_CANDIDATES
            )));
        }
        Ok(())
    }

    /// Number of candidates in the grid
    pub fn len(&self) -> usize {
        // The epsilon absorbs representation error in (end - start) / step.
        ((self.end - self.start) / self.step + 1e-9).floor() as usize + 1
    }

    /// A validated grid always holds at least `start`
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Candidates in ascending order
    pub fn candidates(&self) -> Vec<f64> {
        (0..self.len()).map(|i| self.candidate(i)).collect()
    }

    fn candidate(&self, i: usize) -> f64 {
        let k = self.start + i as f64 * self.step;
        (k * GRID_RESOLUTION).round() / GRID_RESOLUTION
    }

    /// Whether `k` is one of the grid's candidates
    pub fn contains(&self, k: f64) -> bool {
        let i = ((k - self.start) / self.step).round();
        if !(i >= 0.0 && i < self.len() as f64) {
            return false;
        }
        self.candidate(i as usize) == k
    }
}

/// Winning candidate of a grid search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridSearchOutcome {
    /// Candidate with the smallest score
    pub k: f64,
    /// Score of that candidate
    pub score: f64,
}

/// Score every candidate and return the one with the lowest score.
///
/// Candidates are visited in the order given; on equal scores the first one
/// visited wins. Non-finite scores never win.
pub fn grid_search<F>(candidates: &[f64], mut score: F) -> Result<GridSearchOutcome>
where
    F: FnMut(f64) -> Result<f64>,
{
    if candidates.is_empty() {
        return Err(MathError::InsufficientData(
            "Grid search needs at least one candidate".to_string(),
        ));
    }

    let mut best: Option<GridSearchOutcome> = None;
    for &k in candidates {
        let s = score(k)?;
        if !s.is_finite() {
            continue;
        }
        if best.map_or(true, |b| s < b.score) {
            best = Some(GridSearchOutcome { k, score: s });
        }
    }

    best.ok_or_else(|| {
        MathError::CalculationError("No candidate produced a finite score".to_string())
    })
}
