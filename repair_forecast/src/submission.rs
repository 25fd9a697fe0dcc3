//! Submission table: one `id,target` row per target, in target order

use crate::error::{ForecastError, Result};
use crate::forecast::ForecastRecord;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Output row matched to the target table by position
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionRow {
    pub id: usize,
    pub target: f64,
}

/// Convert forecasts into submission rows.
///
/// Ids must run 1, 2, 3, ... in the order given, since consumers match rows
/// by position.
pub fn submission_rows(forecasts: &[ForecastRecord]) -> Result<Vec<SubmissionRow>> {
    forecasts
        .iter()
        .enumerate()
        .map(|(i, f)| {
            if f.row_id != i + 1 {
                return Err(ForecastError::ValidationError(format!(
                    "Forecast at position {} carries id {}",
                    i + 1,
                    f.row_id
                )));
            }
            Ok(SubmissionRow {
                id: f.row_id,
                target: f.predicted_count,
            })
        })
        .collect()
}

/// Writer for submission CSV files
#[derive(Debug)]
pub struct SubmissionWriter;

impl SubmissionWriter {
    /// Write rows with an `id,target` header to a file
    pub fn to_csv<P: AsRef<Path>>(path: P, rows: &[SubmissionRow]) -> Result<()> {
        let file = File::create(path)?;
        Self::to_writer(file, rows)
    }

    /// Write rows with an `id,target` header to any writer
    pub fn to_writer<W: Write>(writer: W, rows: &[SubmissionRow]) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
