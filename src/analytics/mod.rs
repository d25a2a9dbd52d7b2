//! Order analytics
//!
//! Restricts the dataset to a date range and derives the dashboard tables:
//! orders per day, orders per product category, and distinct customers per
//! state. All functions here are pure; a [`DashboardView`] is recomputed from
//! the dataset on every request.

pub mod aggregate;
pub mod filter;
pub mod view;


pub use aggregate::{
    best_categories, category_order_counts, daily_order_counts, densify_daily_counts,
    state_customer_counts, top_states, worst_categories, CategoryOrderCount, DailyOrderCount,
    StateCustomerCount,
};
pub use filter::{filter_by_range, DateRange};
pub use view::{DashboardView, ViewOptions};
