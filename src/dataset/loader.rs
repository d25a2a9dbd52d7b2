//! CSV ingestion for order exports

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Deserialize;
use std::io::Read;
use tracing::{debug, trace};

use super::OrderRecord;
use crate::error::{Error, Result};

/// Accepted layouts for `order_purchase_timestamp`, tried in order
const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Columns every export must carry, even when some cells are empty
const REQUIRED_COLUMNS: &[&str] = &[
    "customer_id",
    "customer_state",
    "product_category_name_english",
    "order_purchase_timestamp",
];

/// Row layout of the order export. Columns not named here are ignored.
#[derive(Debug, Deserialize)]
struct OrderRow {
    #[serde(default)]
    order_id: Option<String>,
    customer_id: String,
    customer_state: String,
    #[serde(rename = "product_category_name_english")]
    product_category: Option<String>,
    order_purchase_timestamp: String,
}

/// Parse a purchase timestamp.
///
/// Accepts `YYYY-MM-DD HH:MM:SS` (optionally with fractional seconds or a
/// `T` separator), RFC 3339 with an offset (kept as wall-clock time), and a
/// bare `YYYY-MM-DD` which maps to midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    for format in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(value, format) {
            return Some(ts);
        }
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.naive_local());
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .map(|date| date.and_time(NaiveTime::MIN))
}

/// Read every order row from a CSV source.
///
/// A missing required column or an unparseable timestamp aborts the read;
/// the dashboard has nothing sensible to show for a partially loaded export.
pub fn read_orders<R: Read>(reader: R) -> Result<Vec<OrderRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?;
    if let Some(column) = REQUIRED_COLUMNS
        .iter()
        .find(|column| !headers.iter().any(|h| h == **column))
    {
        return Err(Error::MissingColumn(column.to_string()));
    }

    let mut records = Vec::new();
    for (index, row) in csv_reader.deserialize::<OrderRow>().enumerate() {
        let row = row?;
        let purchased_at =
            parse_timestamp(&row.order_purchase_timestamp).ok_or_else(|| Error::Timestamp {
                row: index + 1,
                value: row.order_purchase_timestamp.clone(),
            })?;

        trace!("Parsed order row {}: {:?}", index + 1, row);

        records.push(OrderRecord {
            order_id: row.order_id.filter(|id| !id.is_empty()),
            customer_id: row.customer_id,
            customer_state: row.customer_state,
            product_category: row.product_category.filter(|c| !c.is_empty()),
            purchased_at,
        });
    }

    debug!("Read {} order rows", records.len());
    Ok(records)
}
