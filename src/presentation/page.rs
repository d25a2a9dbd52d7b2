use chrono::NaiveDate;
use serde::Serialize;
use tera::{Context, Tera};

use super::chart::{category_chart, daily_orders_chart, state_chart, Chart, Choropleth};
use crate::analytics::{best_categories, top_states, worst_categories, DashboardView, DateRange};
use crate::config::DashboardConfig;
use crate::error::Result;

/// Presentation choices taken from configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSettings {
    pub title: String,
    pub best_categories: usize,
    pub worst_categories: usize,
    pub top_states: usize,
    pub map_title: String,
    pub feature_id_key: String,
}

impl From<&DashboardConfig> for PageSettings {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            title: config.title.clone(),
            best_categories: config.best_categories,
            worst_categories: config.worst_categories,
            top_states: config.top_states,
            map_title: config.boundaries.map_title.clone(),
            feature_id_key: config.boundaries.feature_id_key.clone(),
        }
    }
}

impl Default for PageSettings {
    fn default() -> Self {
        Self::from(&DashboardConfig::default())
    }
}

/// Everything the page template needs for one request
#[derive(Debug, Clone, Serialize)]
pub struct DashboardPage {
    pub title: String,
    pub range: DateRange,
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    pub total_orders: u64,
    pub daily_orders: Chart,
    pub best_categories: Chart,
    pub worst_categories: Chart,
    pub top_states: Chart,
    pub map: Option<Choropleth>,
}

impl DashboardPage {
    /// Map a computed view onto chart specifications.
    ///
    /// `bounds` limits the date picker; `with_map` is false when no boundary
    /// document was loaded.
    pub fn build(
        view: &DashboardView,
        bounds: DateRange,
        settings: &PageSettings,
        with_map: bool,
    ) -> Self {
        let best = best_categories(&view.categories, settings.best_categories);
        let worst = worst_categories(&view.categories, settings.worst_categories);
        let states = top_states(&view.states, settings.top_states);

        Self {
            title: settings.title.clone(),
            range: view.range,
            min_date: bounds.start,
            max_date: bounds.end,
            total_orders: view.total_orders,
            daily_orders: daily_orders_chart(&view.daily_orders),
            best_categories: category_chart("Best Performing Product", &best, false),
            worst_categories: category_chart("Worst Performing Product", &worst, true),
            top_states: state_chart("Number of Customer by States", &states),
            map: with_map.then(|| {
                Choropleth::from_states(&settings.map_title, &view.states, &settings.feature_id_key)
            }),
        }
    }
}

/// Renders dashboard pages from the built-in template
pub struct PageRenderer {
    template_engine: Tera,
}

impl PageRenderer {
    pub fn new() -> Result<Self> {
        let mut template_engine = Tera::default();
        template_engine.add_raw_template("dashboard.html", DASHBOARD_TEMPLATE)?;

        Ok(Self { template_engine })
    }

    pub fn render(&self, page: &DashboardPage) -> Result<String> {
        // Chart specs go inside a <script> element
        let charts_json = serde_json::to_string(page)?.replace("</", "<\\/");

        let mut context = Context::new();
        context.insert("page", page);
        context.insert("charts_json", &charts_json);

        Ok(self.template_engine.render("dashboard.html", &context)?)
    }
}

const DASHBOARD_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{{ page.title }}</title>
    <script src="https://cdn.plot.ly/plotly-2.35.2.min.js" charset="utf-8"></script>
    <style>
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 0;
            display: flex;
            background-color: #f5f5f5;
            color: #2c3e50;
        }
        .sidebar {
            width: 260px;
            min-height: 100vh;
            padding: 20px;
            background-color: #2c3e50;
            color: white;
            box-sizing: border-box;
        }
        .sidebar label {
            display: block;
            margin: 12px 0 4px 0;
            font-size: 14px;
        }
        .sidebar input, .sidebar button {
            width: 100%;
            padding: 6px;
            box-sizing: border-box;
        }
        .sidebar button {
            margin-top: 16px;
        }
        .content {
            flex: 1;
            max-width: 1200px;
            padding: 20px;
        }
        .card {
            background-color: white;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
            padding: 20px;
            margin-bottom: 20px;
        }
        .metric-value {
            font-size: 32px;
            font-weight: bold;
            color: #3498db;
        }
        .metric-label {
            font-size: 14px;
            color: #666;
        }
        .row {
            display: flex;
            gap: 20px;
        }
        .row > div {
            flex: 1;
        }
        .empty {
            color: #999;
        }
    </style>
</head>
<body>
    <form class="sidebar" method="get" action="/">
        <h3>Date Range</h3>
        <label for="start">Start date</label>
        <input type="date" id="start" name="start" value="{{ page.range.start }}" min="{{ page.min_date }}" max="{{ page.max_date }}">
        <label for="end">End date</label>
        <input type="date" id="end" name="end" value="{{ page.range.end }}" min="{{ page.min_date }}" max="{{ page.max_date }}">
        <button type="submit">Apply</button>
    </form>
    <div class="content">
        <h1>{{ page.title }}</h1>

        <div class="card">
            <h2>Daily Orders</h2>
            <div class="metric-label">Total orders</div>
            <div class="metric-value" id="total-orders">{{ page.total_orders }}</div>
            {% if page.total_orders == 0 %}
            <p class="empty">No orders between {{ page.range.start }} and {{ page.range.end }}.</p>
            {% endif %}
            <div id="daily-orders"></div>
        </div>

        <div class="card">
            <h2>Best &amp; Worst Performing Product</h2>
            <div class="row">
                <div id="best-categories"></div>
                <div id="worst-categories"></div>
            </div>
        </div>

        <div class="card">
            <h2>Customer Locations</h2>
            <div id="top-states"></div>
            {% if page.map %}
            <div id="state-map"></div>
            {% endif %}
        </div>
    </div>

    <script>
        const page = {{ charts_json | safe }};

        function series(chart) {
            return chart.data.datasets[0] || { values: [], colors: [] };
        }

        function axisTitle(label) {
            return label ? { text: label } : undefined;
        }

        function drawLine(target, chart) {
            const s = series(chart);
            Plotly.newPlot(target, [{
                x: chart.data.labels,
                y: s.values,
                mode: 'lines+markers',
                line: { color: s.colors[0], width: 2 },
                marker: { color: s.colors[0] }
            }], { title: { text: chart.title } }, { responsive: true });
        }

        function drawBars(target, chart) {
            const s = series(chart);
            Plotly.newPlot(target, [{
                type: 'bar',
                orientation: 'h',
                x: s.values,
                y: chart.data.labels,
                marker: { color: s.colors }
            }], {
                title: { text: chart.title },
                xaxis: { title: axisTitle(chart.x_label), autorange: chart.reversed ? 'reversed' : true },
                yaxis: { autorange: 'reversed', side: chart.reversed ? 'right' : 'left' }
            }, { responsive: true });
        }

        async function drawMap(target, map) {
            const response = await fetch(map.geojson_url);
            const geojson = await response.json();
            Plotly.newPlot(target, [{
                type: 'choropleth',
                geojson: geojson,
                featureidkey: map.feature_id_key,
                locations: map.locations,
                z: map.values,
                text: map.locations,
                colorscale: map.color_scale,
                hovertemplate: map.hover_template
            }], {
                title: { text: map.title, x: 0.5, y: 0.9, xanchor: 'center', yanchor: 'top' },
                geo: { fitbounds: map.fit_bounds ? 'locations' : false, visible: false }
            }, { responsive: true });
        }

        drawLine('daily-orders', page.daily_orders);
        drawBars('best-categories', page.best_categories);
        drawBars('worst-categories', page.worst_categories);
        drawBars('top-states', page.top_states);
        if (page.map) {
            drawMap('state-map', page.map).catch(err => console.error('Failed to draw map:', err));
        }
    </script>
</body>
</html>
"#;
