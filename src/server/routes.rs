use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, Json},
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use super::DashboardContext;
use crate::analytics::{
    best_categories, top_states, worst_categories, CategoryOrderCount, DailyOrderCount,
    DashboardView, DateRange, StateCustomerCount,
};

/// Date range query parameters; a missing or blank bound falls back to the
/// dataset
#[derive(Debug, Default, Deserialize)]
pub struct RangeQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub end: Option<NaiveDate>,
}

/// A cleared date input submits `start=`, which means "no bound"
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}

impl RangeQuery {
    pub fn resolve(&self, full: DateRange) -> DateRange {
        DateRange::new(
            self.start.unwrap_or(full.start),
            self.end.unwrap_or(full.end),
        )
    }
}

#[derive(Debug, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

// Route handlers

pub async fn dashboard_home(
    State(context): State<Arc<DashboardContext>>,
    Query(params): Query<RangeQuery>,
) -> Result<Html<String>, StatusCode> {
    let range = params.resolve(context.full_range());
    debug!("Rendering dashboard for {} to {}", range.start, range.end);

    context.render_page(range).map(Html).map_err(|e| {
        warn!("Failed to render dashboard: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

pub async fn health_check(State(context): State<Arc<DashboardContext>>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        timestamp: Utc::now(),
        orders: context.dataset().len(),
        map_enabled: context.boundaries().is_some(),
    })
}

pub async fn get_dashboard(
    State(context): State<Arc<DashboardContext>>,
    Query(params): Query<RangeQuery>,
) -> Json<DashboardView> {
    Json(context.view(params.resolve(context.full_range())))
}

pub async fn get_daily_orders(
    State(context): State<Arc<DashboardContext>>,
    Query(params): Query<RangeQuery>,
) -> Json<DailyOrdersResponse> {
    let view = context.view(params.resolve(context.full_range()));

    Json(DailyOrdersResponse {
        range: view.range,
        total_orders: view.total_orders,
        days: view.daily_orders,
    })
}

pub async fn get_categories(
    State(context): State<Arc<DashboardContext>>,
    Query(params): Query<RangeQuery>,
) -> Json<CategoriesResponse> {
    let view = context.view(params.resolve(context.full_range()));
    let settings = context.settings();

    Json(CategoriesResponse {
        range: view.range,
        best: best_categories(&view.categories, settings.best_categories),
        worst: worst_categories(&view.categories, settings.worst_categories),
        all: view.categories,
    })
}

pub async fn get_states(
    State(context): State<Arc<DashboardContext>>,
    Query(params): Query<RangeQuery>,
    Query(limit): Query<LimitQuery>,
) -> Json<StatesResponse> {
    let view = context.view(params.resolve(context.full_range()));

    let states = match limit.limit {
        Some(n) => top_states(&view.states, n),
        None => view.states,
    };

    Json(StatesResponse {
        range: view.range,
        states,
    })
}

pub async fn get_boundaries(
    State(context): State<Arc<DashboardContext>>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    context
        .boundaries()
        .map(|document| Json(document.geojson().clone()))
        .ok_or(StatusCode::NOT_FOUND)
}

// Response types

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    status: String,
    timestamp: DateTime<Utc>,
    orders: usize,
    map_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct DailyOrdersResponse {
    range: DateRange,
    total_orders: u64,
    days: Vec<DailyOrderCount>,
}

#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    range: DateRange,
    all: Vec<CategoryOrderCount>,
    best: Vec<CategoryOrderCount>,
    worst: Vec<CategoryOrderCount>,
}

#[derive(Debug, Serialize)]
pub struct StatesResponse {
    range: DateRange,
    states: Vec<StateCustomerCount>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_range_query_defaults_to_full_range() {
        let full = DateRange::new(date(2016, 9, 4), date(2018, 10, 17));

        assert_eq!(RangeQuery::default().resolve(full), full);

        let partial = RangeQuery {
            start: Some(date(2017, 1, 1)),
            end: None,
        };
        assert_eq!(
            partial.resolve(full),
            DateRange::new(date(2017, 1, 1), date(2018, 10, 17))
        );
    }

    fn parse(uri: &str) -> Option<RangeQuery> {
        let uri: axum::http::Uri = uri.parse().unwrap();
        Query::<RangeQuery>::try_from_uri(&uri).ok().map(|q| q.0)
    }

    #[test]
    fn test_blank_bounds_are_absent() {
        let query = parse("/?start=&end=2017-01-02").unwrap();
        assert_eq!(query.start, None);
        assert_eq!(query.end, Some(date(2017, 1, 2)));

        let query = parse("/?start=&end=").unwrap();
        assert_eq!(query.start, None);
        assert_eq!(query.end, None);

        let query = parse("/").unwrap();
        assert_eq!(query.start, None);
    }

    #[test]
    fn test_malformed_bound_is_rejected() {
        assert!(parse("/?start=yesterday").is_none());
        assert!(parse("/?end=2017-13-01").is_none());
    }
}
