//! Calendar day keys.
//!
//! A [`DateKey`] is the `{day, month, year}` triple every ledger is indexed
//! by. Keys are compared field by field and are never validated on storage;
//! conversion to a real calendar date is only attempted where date
//! arithmetic is needed (streak walks, "today").

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A caller-supplied calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateKey {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

impl DateKey {
    pub fn new(day: u32, month: u32, year: i32) -> Self {
        Self { day, month, year }
    }

    /// The calendar date for this key, or `None` when the triple is not a
    /// real day (e.g. 31 February).
    pub fn to_naive(self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// The key `days` calendar days away, if both ends are real dates.
    pub fn offset(self, days: i64) -> Option<Self> {
        let date = self.to_naive()?.checked_add_signed(Duration::days(days))?;
        Some(date.into())
    }

    pub fn previous(self) -> Option<Self> {
        self.offset(-1)
    }
}

/// Chronological: year, then month, then day.
impl Ord for DateKey {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.year, self.month, self.day).cmp(&(other.year, other.month, other.day))
    }
}

impl PartialOrd for DateKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self {
            day: date.day(),
            month: date.month(),
            year: date.year(),
        }
    }
}

/// `YYYY-MM-DD`, zero padded, matching the legacy status-map keys.
impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}

impl FromStr for DateKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidDate(s.to_string());
        let mut parts = s.trim().splitn(3, '-');
        let year = parts.next().ok_or_else(invalid)?;
        let month = parts.next().ok_or_else(invalid)?;
        let day = parts.next().ok_or_else(invalid)?;
        let key = DateKey {
            day: day.parse().map_err(|_| invalid())?,
            month: month.parse().map_err(|_| invalid())?,
            year: year.parse().map_err(|_| invalid())?,
        };
        key.to_naive().ok_or_else(invalid)?;
        Ok(key)
    }
}
