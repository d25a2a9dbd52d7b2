//! # Orderboard
//!
//! Serve an interactive analytics dashboard over an e-commerce order export.
//!
//! ## Usage
//!
//! ```bash
//! orderboard serve --data all_data.csv [--port 8501] [--no-map]
//! orderboard summary --data all_data.csv --start 2017-01-01 --end 2017-12-31
//! ```
//!
//! ## Modules
//!
//! - `dataset` - CSV ingestion into an immutable, timestamp-ordered record set
//! - `analytics` - Date-range filter and the daily/category/state aggregations
//! - `geo` - GeoJSON boundary documents for the choropleth map
//! - `presentation` - Chart and map specifications plus the HTML page renderer
//! - `server` - axum routes answering each request with a freshly computed view
//! - `config` - Layered TOML and environment configuration
pub mod analytics;
pub mod config;
pub mod dataset;
pub mod error;
pub mod geo;
pub mod presentation;
pub mod server;

pub use error::{Error, Result};
