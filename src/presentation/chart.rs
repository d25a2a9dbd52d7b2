use serde::{Deserialize, Serialize};

use super::{HIGHLIGHT_COLOR, MUTED_COLOR};
use crate::analytics::{CategoryOrderCount, DailyOrderCount, StateCustomerCount};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    Line,
    Bar,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Vertical,
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Series>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub values: Vec<u64>,
    /// One color per point, or a single color for the whole series
    pub colors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chart {
    pub title: String,
    pub chart_type: ChartType,
    pub orientation: Orientation,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    /// Draw the value axis right to left
    pub reversed: bool,
    pub data: ChartData,
}

impl Chart {
    /// Labels and values of the first series, paired
    pub fn points(&self) -> Vec<(&str, u64)> {
        let values = self
            .data
            .datasets
            .first()
            .map(|s| s.values.as_slice())
            .unwrap_or(&[]);
        self.data
            .labels
            .iter()
            .map(String::as_str)
            .zip(values.iter().copied())
            .collect()
    }
}

/// Colors for a ranked bar list: the leader stands out, the rest are muted
pub fn highlight_palette(len: usize) -> Vec<String> {
    (0..len)
        .map(|i| {
            let color = if i == 0 { HIGHLIGHT_COLOR } else { MUTED_COLOR };
            color.to_string()
        })
        .collect()
}

/// Line chart of orders per day
pub fn daily_orders_chart(daily: &[DailyOrderCount]) -> Chart {
    Chart {
        title: "Daily Orders".to_string(),
        chart_type: ChartType::Line,
        orientation: Orientation::Vertical,
        x_label: None,
        y_label: None,
        reversed: false,
        data: ChartData {
            labels: daily.iter().map(|d| d.date.to_string()).collect(),
            datasets: vec![Series {
                label: "item_orders".to_string(),
                values: daily.iter().map(|d| d.orders).collect(),
                colors: vec![HIGHLIGHT_COLOR.to_string()],
            }],
        },
    }
}

/// Horizontal bar list of categories in the order given
pub fn category_chart(title: &str, ranked: &[CategoryOrderCount], reversed: bool) -> Chart {
    Chart {
        title: title.to_string(),
        chart_type: ChartType::Bar,
        orientation: Orientation::Horizontal,
        x_label: Some("Number of Sales".to_string()),
        y_label: None,
        reversed,
        data: ChartData {
            labels: ranked.iter().map(|c| c.category.clone()).collect(),
            datasets: vec![Series {
                label: "product_order".to_string(),
                values: ranked.iter().map(|c| c.orders).collect(),
                colors: highlight_palette(ranked.len()),
            }],
        },
    }
}

/// Horizontal bar list of states in the order given
pub fn state_chart(title: &str, ranked: &[StateCustomerCount]) -> Chart {
    Chart {
        title: title.to_string(),
        chart_type: ChartType::Bar,
        orientation: Orientation::Horizontal,
        x_label: None,
        y_label: None,
        reversed: false,
        data: ChartData {
            labels: ranked.iter().map(|s| s.state.clone()).collect(),
            datasets: vec![Series {
                label: "customers".to_string(),
                values: ranked.iter().map(|s| s.customers).collect(),
                colors: highlight_palette(ranked.len()),
            }],
        },
    }
}

/// Map shading each region by its customer count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Choropleth {
    pub title: String,
    pub locations: Vec<String>,
    pub values: Vec<u64>,
    pub feature_id_key: String,
    pub color_scale: String,
    pub hover_template: String,
    pub fit_bounds: bool,
    /// Route serving the boundary document
    pub geojson_url: String,
}

impl Choropleth {
    pub fn from_states(title: &str, states: &[StateCustomerCount], feature_id_key: &str) -> Self {
        Self {
            title: title.to_string(),
            locations: states.iter().map(|s| s.state.clone()).collect(),
            values: states.iter().map(|s| s.customers).collect(),
            feature_id_key: feature_id_key.to_string(),
            color_scale: "Blues".to_string(),
            hover_template: "%{z}<extra></extra>".to_string(),
            fit_bounds: true,
            geojson_url: "/api/boundaries".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn state(code: &str, customers: u64) -> StateCustomerCount {
        StateCustomerCount {
            state: code.to_string(),
            customers,
        }
    }

    #[test]
    fn test_highlight_palette() {
        assert!(highlight_palette(0).is_empty());
        assert_eq!(
            highlight_palette(3),
            vec![HIGHLIGHT_COLOR, MUTED_COLOR, MUTED_COLOR]
        );
    }

    #[test]
    fn test_daily_chart_labels_are_iso_dates() {
        let daily = vec![
            DailyOrderCount {
                date: NaiveDate::from_ymd_opt(2017, 1, 1).unwrap(),
                orders: 2,
            },
            DailyOrderCount {
                date: NaiveDate::from_ymd_opt(2017, 1, 2).unwrap(),
                orders: 1,
            },
        ];
        let chart = daily_orders_chart(&daily);

        assert_eq!(chart.chart_type, ChartType::Line);
        assert_eq!(chart.points(), vec![("2017-01-01", 2), ("2017-01-02", 1)]);
    }

    #[test]
    fn test_category_chart_keeps_rank_order() {
        let ranked = vec![
            CategoryOrderCount {
                category: "toys".to_string(),
                orders: 9,
            },
            CategoryOrderCount {
                category: "books".to_string(),
                orders: 4,
            },
        ];
        let chart = category_chart("Best Performing Product", &ranked, false);

        assert_eq!(chart.orientation, Orientation::Horizontal);
        assert_eq!(chart.points(), vec![("toys", 9), ("books", 4)]);
        assert_eq!(chart.data.datasets[0].colors.len(), 2);
        assert_eq!(chart.x_label.as_deref(), Some("Number of Sales"));
    }

    #[test]
    fn test_choropleth_from_states() {
        let states = vec![state("SP", 40), state("RJ", 12)];
        let map = Choropleth::from_states("Map", &states, "properties.sigla");

        assert_eq!(map.locations, vec!["SP", "RJ"]);
        assert_eq!(map.values, vec![40, 12]);
        assert_eq!(map.color_scale, "Blues");
        assert!(map.fit_bounds);
    }
}
