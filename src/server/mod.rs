//! HTTP surface of the dashboard
//!
//! Every request names a date range (defaulting to the whole dataset) and
//! gets a response computed from scratch against the shared, read-only
//! [`DashboardContext`].

use anyhow::{Context as _, Result};
use axum::{routing::get, Router};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

pub mod routes;

use crate::analytics::{DashboardView, DateRange, ViewOptions};
use crate::config::DashboardConfig;
use crate::dataset::Dataset;
use crate::geo::BoundaryDocument;
use crate::presentation::{DashboardPage, PageRenderer, PageSettings};

/// Process-wide state, built once at startup and never mutated
pub struct DashboardContext {
    dataset: Dataset,
    boundaries: Option<BoundaryDocument>,
    renderer: PageRenderer,
    settings: PageSettings,
    options: ViewOptions,
}

impl DashboardContext {
    pub fn new(
        dataset: Dataset,
        boundaries: Option<BoundaryDocument>,
        settings: PageSettings,
        options: ViewOptions,
    ) -> crate::Result<Self> {
        Ok(Self {
            dataset,
            boundaries,
            renderer: PageRenderer::new()?,
            settings,
            options,
        })
    }

    /// Load the dataset and, unless disabled, the boundary document
    pub async fn from_config(config: &DashboardConfig) -> Result<Self> {
        let dataset = load_dataset(&config.data_path)?;

        let boundaries = match config.boundaries.source() {
            Some(source) => {
                let document =
                    BoundaryDocument::load(&source, &config.boundaries.feature_id_key)
                        .await
                        .with_context(|| format!("Failed to load boundaries from {source}"))?;
                warn_unmatched_states(&dataset, &document);
                Some(document)
            }
            None => {
                info!("Map disabled, skipping boundary document");
                None
            }
        };

        Ok(Self::new(
            dataset,
            boundaries,
            PageSettings::from(config),
            config.view_options(),
        )?)
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn boundaries(&self) -> Option<&BoundaryDocument> {
        self.boundaries.as_ref()
    }

    pub fn settings(&self) -> &PageSettings {
        &self.settings
    }

    pub fn full_range(&self) -> DateRange {
        self.dataset.full_range()
    }

    pub fn view(&self, range: DateRange) -> DashboardView {
        DashboardView::compute(&self.dataset, range, &self.options)
    }

    pub fn page(&self, range: DateRange) -> DashboardPage {
        DashboardPage::build(
            &self.view(range),
            self.full_range(),
            &self.settings,
            self.boundaries.is_some(),
        )
    }

    pub fn render_page(&self, range: DateRange) -> crate::Result<String> {
        self.renderer.render(&self.page(range))
    }
}

fn load_dataset(path: &Path) -> Result<Dataset> {
    Dataset::load_csv(path)
        .with_context(|| format!("Failed to load orders from {}", path.display()))
}

fn warn_unmatched_states(dataset: &Dataset, boundaries: &BoundaryDocument) {
    let unmatched = boundaries.unmatched(
        dataset
            .records()
            .iter()
            .map(|r| r.customer_state.as_str()),
    );
    if !unmatched.is_empty() {
        warn!(
            "{} customer states have no boundary feature: {}",
            unmatched.len(),
            unmatched.join(", ")
        );
    }
}

/// Build the router over a shared context
pub fn router(context: Arc<DashboardContext>) -> Router {
    Router::new()
        // Dashboard UI
        .route("/", get(routes::dashboard_home))
        // API endpoints
        .route("/api/health", get(routes::health_check))
        .route("/api/dashboard", get(routes::get_dashboard))
        .route("/api/orders/daily", get(routes::get_daily_orders))
        .route("/api/categories", get(routes::get_categories))
        .route("/api/states", get(routes::get_states))
        .route("/api/boundaries", get(routes::get_boundaries))
        .layer(CorsLayer::permissive())
        .with_state(context)
}

pub struct DashboardServer {
    address: String,
    context: Arc<DashboardContext>,
}

impl DashboardServer {
    pub fn new(address: impl Into<String>, context: DashboardContext) -> Self {
        Self {
            address: address.into(),
            context: Arc::new(context),
        }
    }

    pub async fn start(self) -> Result<()> {
        let app = router(self.context);

        let listener = tokio::net::TcpListener::bind(&self.address)
            .await
            .with_context(|| format!("Failed to bind {}", self.address))?;
        info!("Dashboard server listening on http://{}", self.address);

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Dashboard server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
