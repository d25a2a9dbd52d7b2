//! Order dataset loaded once at startup
//!
//! The dataset is an immutable snapshot of order line items, sorted by
//! purchase timestamp. Every dashboard request reads from the same
//! snapshot; nothing mutates it after [`Dataset::new`].

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

pub mod loader;

pub use loader::{parse_timestamp, read_orders};

use crate::analytics::DateRange;
use crate::error::{Error, Result};

/// One purchased line item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub order_id: Option<String>,
    pub customer_id: String,
    pub customer_state: String,
    pub product_category: Option<String>,
    pub purchased_at: NaiveDateTime,
}

impl OrderRecord {
    /// Calendar day of the purchase
    pub fn purchase_date(&self) -> NaiveDate {
        self.purchased_at.date()
    }
}

/// Immutable, timestamp-ordered set of order records
#[derive(Debug, Clone)]
pub struct Dataset {
    records: Vec<OrderRecord>,
}

impl Dataset {
    /// Build a dataset from records, ordering them by purchase timestamp.
    ///
    /// An empty record set is rejected: the dashboard needs a first and last
    /// purchase date to offer a default interval.
    pub fn new(mut records: Vec<OrderRecord>) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::EmptyDataset);
        }
        records.sort_by_key(|r| r.purchased_at);
        Ok(Self { records })
    }

    /// Load a dataset from a CSV file on disk
    pub fn load_csv(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let dataset = Self::new(read_orders(file)?)?;

        let range = dataset.full_range();
        info!(
            "Loaded {} order records from {} ({} to {})",
            dataset.len(),
            path.display(),
            range.start,
            range.end
        );

        Ok(dataset)
    }

    /// Load a dataset from any CSV reader
    pub fn from_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        Self::new(read_orders(reader)?)
    }

    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Interval spanning the first and last purchase dates
    pub fn full_range(&self) -> DateRange {
        // Non-empty and sorted, guaranteed by `new`
        let first = self.records[0].purchase_date();
        let last = self.records[self.records.len() - 1].purchase_date();
        DateRange::new(first, last)
    }
}
