//! Input tables and CSV ingestion
//!
//! The raw repair log has one row per (module, component, sale month,
//! repair month). Forecasting works on the sparse observation table
//! derived from it: one summed count per (item, repair month).

use crate::error::{ForecastError, Result};
use crate::month::Month;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Identifier of a module/component pair
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Item id of a module/component pair: the two categories concatenated
    pub fn from_categories(module: &str, component: &str) -> Self {
        Self(format!("{}{}", module.trim(), component.trim()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Number of repairs of one item in one month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub item_id: ItemId,
    pub month: Month,
    pub repair_count: f64,
}

impl Observation {
    pub fn new(item_id: impl Into<ItemId>, month: Month, repair_count: f64) -> Self {
        Self {
            item_id: item_id.into(),
            month,
            repair_count,
        }
    }
}

/// One requested prediction, carrying its 1-based position in the target table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRow {
    pub row_id: usize,
    pub item_id: ItemId,
    pub month: Month,
}

/// Row of the raw repair log
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRepairRecord {
    pub module_category: String,
    pub component_category: String,
    #[serde(rename = "year/month(sale)")]
    pub sale_month: String,
    #[serde(rename = "year/month(repair)")]
    pub repair_month: String,
    pub number_repair: f64,
}

/// Row of the target mapping table
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MappingRecord {
    pub module_category: String,
    pub component_category: String,
    pub year: i32,
    pub month: u32,
}

/// Sum raw repair rows into one observation per (item, repair month).
///
/// Output is sorted by item then month.
pub fn aggregate_repairs<I>(records: I) -> Result<Vec<Observation>>
where
    I: IntoIterator<Item = RawRepairRecord>,
{
    let mut totals: BTreeMap<(ItemId, Month), f64> = BTreeMap::new();
    for record in records {
        if !(record.number_repair >= 0.0 && record.number_repair.is_finite()) {
            return Err(ForecastError::DataError(format!(
                "Repair count must be a non-negative number, got {} for {}{} in {}",
                record.number_repair,
                record.module_category,
                record.component_category,
                record.repair_month
            )));
        }
        let item_id = ItemId::from_categories(&record.module_category, &record.component_category);
        let month: Month = record.repair_month.parse()?;
        *totals.entry((item_id, month)).or_insert(0.0) += record.number_repair;
    }

    Ok(totals
        .into_iter()
        .map(|((item_id, month), repair_count)| Observation {
            item_id,
            month,
            repair_count,
        })
        .collect())
}

/// Turn mapping rows into target rows numbered from 1 in input order
pub fn number_targets<I>(records: I) -> Result<Vec<TargetRow>>
where
    I: IntoIterator<Item = MappingRecord>,
{
    records
        .into_iter()
        .enumerate()
        .map(|(i, record)| {
            Ok(TargetRow {
                row_id: i + 1,
                item_id: ItemId::from_categories(&record.module_category, &record.component_category),
                month: Month::new(record.year, record.month)?,
            })
        })
        .collect()
}

/// Distinct items of the target table, sorted
pub fn item_universe(targets: &[TargetRow]) -> Vec<ItemId> {
    targets
        .iter()
        .map(|t| t.item_id.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Loader for the repair log and target mapping CSV files
#[derive(Debug)]
pub struct DataLoader;

impl DataLoader {
    /// Load and aggregate the raw repair log from a CSV file
    pub fn repairs_from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Observation>> {
        let file = File::open(path)?;
        Self::repairs_from_reader(file)
    }

    /// Load and aggregate the raw repair log from any reader
    pub fn repairs_from_reader<R: Read>(reader: R) -> Result<Vec<Observation>> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let records = rdr
            .deserialize::<RawRepairRecord>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        aggregate_repairs(records)
    }

    /// Load the target mapping from a CSV file
    pub fn targets_from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<TargetRow>> {
        let file = File::open(path)?;
        Self::targets_from_reader(file)
    }

    /// Load the target mapping from any reader
    pub fn targets_from_reader<R: Read>(reader: R) -> Result<Vec<TargetRow>> {
        let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
        let records = rdr
            .deserialize::<MappingRecord>()
            .collect::<std::result::Result<Vec<_>, _>>()?;
        number_targets(records)
    }
}
