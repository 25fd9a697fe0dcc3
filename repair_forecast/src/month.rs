//! Calendar months and whole-month arithmetic
//!
//! Repairs are bucketed by calendar month; the day of month carries no
//! information. [`Month`] is the key of every table in this crate and
//! [`MonthRange`] describes the fixed history window.

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A calendar month (year and month, no day)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Create a month, rejecting month numbers outside 1..=12
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ForecastError::ParseError(format!(
                "Month number must be between 1 and 12, got {}",
                month
            )));
        }
        Ok(Self { year, month })
    }

    /// Build a month from literals known to be valid
    pub(crate) const fn from_parts(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    /// The month containing `date`
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Months since year zero; consecutive months differ by one
    pub fn ordinal(&self) -> i64 {
        self.year as i64 * 12 + (self.month as i64 - 1)
    }

    fn from_ordinal(ordinal: i64) -> Self {
        Self {
            year: ordinal.div_euclid(12) as i32,
            month: ordinal.rem_euclid(12) as u32 + 1,
        }
    }

    /// Shift by `months` (negative moves backwards)
    pub fn offset(&self, months: i64) -> Self {
        Self::from_ordinal(self.ordinal() + months)
    }

    pub fn succ(&self) -> Self {
        self.offset(1)
    }

    pub fn pred(&self) -> Self {
        self.offset(-1)
    }

    /// The date of `day` within this month
    pub fn with_day(&self, day: u32) -> Result<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day).ok_or_else(|| {
            ForecastError::InvalidParameter(format!("Day {} does not exist in {}", day, self))
        })
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = ForecastError;

    /// Accepts `YYYY/M`, `YYYY/MM`, `YYYY-MM` and `YYYY-MM-DD`
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let parts: Vec<&str> = s.split(|c| c == '/' || c == '-').collect();
        match parts.as_slice() {
            [year, month] => Month::new(year.parse()?, month.parse()?),
            [_, _, _] => {
                let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .map_err(|e| ForecastError::ParseError(format!("{}: {}", s, e)))?;
                Ok(Month::from_date(date))
            }
            _ => Err(ForecastError::ParseError(format!(
                "Unrecognised month format: {:?}",
                s
            ))),
        }
    }
}

impl TryFrom<String> for Month {
    type Error = ForecastError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Month> for String {
    fn from(month: Month) -> Self {
        month.to_string()
    }
}

/// Inclusive range of calendar months
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRange {
    pub start: Month,
    pub end: Month,
}

impl MonthRange {
    pub fn new(start: Month, end: Month) -> Result<Self> {
        if start > end {
            return Err(ForecastError::InvalidParameter(format!(
                "Month range start ({}) is after end ({})",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// Number of months in the range, both ends included
    pub fn len(&self) -> usize {
        (self.end.ordinal() - self.start.ordinal() + 1).max(0) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, month: Month) -> bool {
        self.start <= month && month <= self.end
    }

    /// Zero-based position of `month` in the range
    pub fn offset_of(&self, month: Month) -> Option<usize> {
        if self.contains(month) {
            Some((month.ordinal() - self.start.ordinal()) as usize)
        } else {
            None
        }
    }

    /// Month at zero-based position `offset`
    pub fn month_at(&self, offset: usize) -> Option<Month> {
        if offset < self.len() {
            Some(self.start.offset(offset as i64))
        } else {
            None
        }
    }

    /// Months in ascending order
    pub fn iter(&self) -> impl Iterator<Item = Month> + '_ {
        (0..self.len()).map(move |i| self.start.offset(i as i64))
    }
}

/// Anchor date for a series whose last known count sits in `base`.
///
/// The anchor is `day` of the month preceding `base`, so the month right
/// after `base` is one whole month away.
pub fn anchor_for(base: Month, day: u32) -> Result<NaiveDate> {
    base.pred().with_day(day)
}

/// Whole calendar months from `anchor` to the first day of `target`.
///
/// Partial months are discarded (truncation toward zero, never rounding).
pub fn months_elapsed(anchor: NaiveDate, target: Month) -> i64 {
    let raw = target.ordinal() - Month::from_date(anchor).ordinal();
    if raw > 0 && anchor.day() > 1 {
        raw - 1
    } else {
        raw
    }
}
