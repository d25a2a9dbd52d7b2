//! Per-request dashboard computation

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::aggregate::{
    category_order_counts, daily_order_counts, densify_daily_counts, state_customer_counts,
    CategoryOrderCount, DailyOrderCount, StateCustomerCount,
};
use super::filter::{filter_by_range, DateRange};
use crate::dataset::Dataset;

/// Knobs that change how a view is derived
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewOptions {
    /// Zero-fill days without orders in the daily series
    pub fill_missing_days: bool,
}

/// Everything the dashboard shows for one date range
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardView {
    pub range: DateRange,
    pub total_orders: u64,
    pub daily_orders: Vec<DailyOrderCount>,
    pub categories: Vec<CategoryOrderCount>,
    pub states: Vec<StateCustomerCount>,
}

impl DashboardView {
    /// Filter the dataset to `range` and derive every table from scratch.
    ///
    /// Zero-filled days never extend past the dataset's own dates, whatever
    /// range the caller asks for.
    pub fn compute(dataset: &Dataset, range: DateRange, options: &ViewOptions) -> Self {
        let filtered = filter_by_range(dataset.records(), &range);

        let mut daily_orders = daily_order_counts(filtered.iter().copied());
        let categories = category_order_counts(filtered.iter().copied());
        let states = state_customer_counts(filtered.iter().copied());

        let total_orders = daily_orders.iter().map(|d| d.orders).sum();

        if options.fill_missing_days {
            let dense_range = range.clamp_to(&dataset.full_range());
            daily_orders = densify_daily_counts(&daily_orders, &dense_range);
        }

        debug!(
            "Computed view for {} to {}: {} orders, {} days, {} categories, {} states",
            range.start,
            range.end,
            total_orders,
            daily_orders.len(),
            categories.len(),
            states.len()
        );

        Self {
            range,
            total_orders,
            daily_orders,
            categories,
            states,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.total_orders == 0
    }
}
