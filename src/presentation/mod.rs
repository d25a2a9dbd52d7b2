//! Chart and map specifications for the dashboard page
//!
//! Turns a [`crate::analytics::DashboardView`] into chart specs (daily
//! line, best/worst category bars, top states, choropleth) and renders the
//! HTML page that draws them client-side.

pub mod chart;
pub mod page;

pub use chart::{Chart, ChartData, ChartType, Choropleth, Orientation, Series};
pub use page::{DashboardPage, PageRenderer, PageSettings};

/// Color of the leading bar and the daily line
pub const HIGHLIGHT_COLOR: &str = "#90CAF9";

/// Color of the remaining bars
pub const MUTED_COLOR: &str = "#D3D3D3";
