//! Inclusive date-range filtering

use chrono::{Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::dataset::OrderRecord;

/// Inclusive interval of calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// An inverted range contains no days and filters everything out
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Day-granularity check: any time on `end`'s date is inside
    pub fn contains(&self, timestamp: &NaiveDateTime) -> bool {
        self.contains_date(timestamp.date())
    }

    /// Overlap with `bounds`; inverted when the two ranges are disjoint
    pub fn clamp_to(&self, bounds: &DateRange) -> DateRange {
        DateRange::new(self.start.max(bounds.start), self.end.min(bounds.end))
    }

    /// Every calendar day in the range, ascending. Empty when inverted.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let mut next = (!self.is_inverted()).then_some(self.start);
        std::iter::from_fn(move || {
            let current = next?;
            next = if current < self.end {
                current.checked_add_days(Days::new(1))
            } else {
                None
            };
            Some(current)
        })
    }
}

/// Keep the records whose purchase date falls inside `range`
pub fn filter_by_range<'a>(records: &'a [OrderRecord], range: &DateRange) -> Vec<&'a OrderRecord> {
    if range.is_inverted() {
        return Vec::new();
    }

    records
        .iter()
        .filter(|record| range.contains(&record.purchased_at))
        .collect()
}
